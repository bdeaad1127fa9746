//! Server configuration: command-line flags and logging defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

pub const APP_NAME: &str = "Mini Editor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address when `--bind` is not given.
pub const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8000);

/// Default upload limit in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "mini_editor_server=info,mini_editor_core=info,tower_http=info"
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "mini-editor", version, about = "Minimal web photo editor")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Directory holding index.html and the editor's static assets
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Largest accepted request body, in megabytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(DEFAULT_BIND),
            static_dir: PathBuf::from("static"),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl ServerConfig {
    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flag_defaults() {
        let parsed = ServerConfig::parse_from(["mini-editor"]);
        assert_eq!(parsed, ServerConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = ServerConfig::parse_from([
            "mini-editor",
            "--bind",
            "0.0.0.0:9000",
            "--static-dir",
            "/srv/editor",
            "--max-upload-mb",
            "5",
        ]);
        assert_eq!(parsed.bind, SocketAddr::from(([0, 0, 0, 0], 9000)));
        assert_eq!(parsed.static_dir, PathBuf::from("/srv/editor"));
        assert_eq!(parsed.max_upload_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        assert!(ServerConfig::try_parse_from(["mini-editor", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn log_filter_covers_both_crates() {
        let filter = default_log_filter();
        assert!(filter.contains("mini_editor_server"));
        assert!(filter.contains("mini_editor_core"));
    }
}
