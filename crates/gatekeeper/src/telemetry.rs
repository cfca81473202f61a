//! Tracing subscriber setup for the gatekeeper binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,gatekeeper=debug";

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence; otherwise [`DEFAULT_FILTER`] applies, or
/// `debug` everywhere when `verbose` is set. Stdout stays free for command
/// output.
///
/// # Arguments
///
/// * `verbose` - Log at debug level for every crate
/// * `json` - Emit one JSON object per record instead of human-readable lines
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "debug" } else { DEFAULT_FILTER };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!(json, verbose, "Telemetry initialized");
    Ok(())
}
