//! Mini Editor Server - HTTP boundary for the render pipeline
//!
//! Serves the editor page and its assets, and exposes `POST /api/render`,
//! which hands the uploaded image and form fields to `mini_editor_core`.

pub mod config;
pub mod error;
pub mod form;
pub mod routes;
pub mod server;

pub use config::{ServerConfig, APP_NAME, APP_VERSION};
pub use error::ApiError;
pub use routes::build_router;
pub use server::{serve, ServerError};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
