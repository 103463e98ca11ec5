//! Tracing setup shared by the server and the Lambda entrypoints

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,promptgen=debug,promptgen_server=debug";

/// Install the global subscriber.
///
/// Lambda ships stdout to CloudWatch, which already timestamps each line,
/// so `json` output omits the time and keeps the target.
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder
            .json()
            .with_current_span(false)
            .without_time()
            .with_target(true)
            .try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
