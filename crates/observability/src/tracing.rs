//! Tracing/logging initialization.
//!
//! `RUST_LOG` wins over the configured filter when set.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `stockmaster_infra=debug`.
    pub filter: String,
    /// JSON lines when true, human-readable otherwise.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: true,
        }
    }
}

impl LoggingConfig {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber. Subsequent calls are no-ops.
pub fn init_with(config: &LoggingConfig) {
    let filter = config.env_filter();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if config.json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_json() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.filter, "info");
        assert!(cfg.json);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: LoggingConfig = serde_json::from_str(r#"{"json": false}"#).unwrap();
        assert_eq!(cfg.filter, "info");
        assert!(!cfg.json);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_with(&LoggingConfig::default());
        init_with(&LoggingConfig {
            filter: "debug".to_string(),
            json: false,
        });
    }
}
