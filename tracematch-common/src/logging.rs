//! Structured logging initialisation, shared by the CLI and server binaries.

/// Initialise `tracing` with an `EnvFilter` driven by `RUST_LOG`
/// (default: `info`). `format` selects human-readable text or
/// structured JSON lines for log aggregation.
pub fn init_tracing(format: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(false).init();
        }
    }
}
