//! Logging initialisation.
//!
//! Logs always go to stderr; stdout is reserved for one-time disclosure
//! output. Field values never include request bodies.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;
use crate::error::{ServerError, ServerResult};

/// Install the global subscriber. `RUST_LOG` overrides `config.level`.
///
/// # Errors
/// Returns [`ServerError::LoggingInit`] if a subscriber is already installed
/// or the filter does not parse.
pub fn init_logging(config: &LoggingConfig) -> ServerResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ServerError::LoggingInit(e.to_string()))?,
    };

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true);

        subscriber
            .with(json_layer)
            .try_init()
            .map_err(|e| ServerError::LoggingInit(e.to_string()))?;
    } else {
        let pretty_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);

        subscriber
            .with(pretty_layer)
            .try_init()
            .map_err(|e| ServerError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}
