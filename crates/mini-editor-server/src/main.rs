use std::process::ExitCode;

use clap::Parser;
use mini_editor_server::{serve, ServerConfig, APP_NAME, APP_VERSION};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();
    mini_editor_server::init_tracing();
    tracing::info!("{APP_NAME} starting v{APP_VERSION}");

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
