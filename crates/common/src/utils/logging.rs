use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing subscriber for local development.
/// - Respects `RUST_LOG` if set
/// - Falls back to `debug,tower_http=debug,sqlx=warn`
/// - Writes compact text to stdout
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug,tower_http=debug,sqlx=warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info`
/// - Emits one JSON object per event for log shippers
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the subscriber for an environment name: `prod` logs JSON, anything else text.
pub fn init_logging_for(env: &str) {
    match env {
        "prod" => init_logging_json(),
        _ => init_logging_default(),
    }
}
