use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::types::Config;

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted. Otherwise the
/// level comes from `RACKOPS_LOG` (read through [`Config`]), defaulting to
/// info. Output is JSON on stderr so stdout stays free for the embedding
/// surface.
pub fn init_logging(quiet: bool) {
    let directive = crate_directive(quiet, &Config::new().log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env().add_directive(
                // An unparseable RACKOPS_LOG value falls back to info
                // rather than refusing to start
                directive.parse().unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();
}

/// Crate-scoped filter directive for the given mode and configured level.
fn crate_directive(quiet: bool, level: &str) -> String {
    if quiet {
        "rackops=error".to_string()
    } else {
        format!("rackops={level}")
    }
}
