//! Tracing subscriber set-up

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::{Result, TravelHubError};

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.level)))
        .map_err(|e| TravelHubError::config(format!("Invalid log level: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
    installed.map_err(|e| TravelHubError::config(format!("Failed to install logger: {e}")))
}

/// Our own crate at the configured level; HTTP plumbing stays at warn
fn default_directive(level: &str) -> String {
    format!("warn,travelhub={level},tower_http={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        for level in ["error", "warn", "info", "debug", "trace"] {
            assert!(EnvFilter::try_new(default_directive(level)).is_ok());
        }
    }
}
