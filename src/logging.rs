use tracing_subscriber::{fmt, EnvFilter};

/// Set to `1` for JSON log lines
pub const ENV_LOG_JSON: &str = "WALLETSTATE_LOG_JSON";

/// Install the stderr subscriber. `RUST_LOG` filters (default `info`).
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if json_requested() {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

fn json_requested() -> bool {
    std::env::var(ENV_LOG_JSON).map(|v| v.trim() == "1").unwrap_or(false)
}
