//! Operational log setup.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The level comes from `RUST_LOG` (default `info`); `debug` forces `debug`.
/// With `json`, every line is a JSON object, which is what the log analysis
/// scripts consume.
pub fn init_tracing(debug: bool, json: bool) -> anyhow::Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}
