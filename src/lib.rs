//! speakable-hook: forwards Claude Code conversation turns to a speech
//! endpoint.
//!
//! - `transcript`: JSONL parsing, turn classification, windowing, formatting
//! - `dispatch`: fire-and-forget POST to the speakable endpoint
//! - `hook`: Stop-hook pipeline (last assistant message)
//! - `context`: last-N-turns context block
//! - `debug_log`: optional diagnostic file
//! - `config`: YAML + environment configuration

pub mod config;
pub mod context;
pub mod debug_log;
pub mod dispatch;
pub mod hook;
pub mod transcript;

use tracing_subscriber::EnvFilter;

/// Install the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
