//! Engine configuration.
//!
//! Layered the usual way:
//! 1. Defaults in code
//! 2. Optional `stockmaster.toml` (or the file named by `STOCKMASTER_CONFIG`)
//! 3. Environment overrides with the `STOCKMASTER_` prefix, `__` between
//!    nested keys (`STOCKMASTER_LOGGING__JSON=false`)

use config::{ConfigError, Environment, File, Map};
use serde::Deserialize;

use stockmaster_observability::LoggingConfig;

const ENV_PREFIX: &str = "STOCKMASTER";
const DEFAULT_FILE: &str = "stockmaster";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Maximum rows in each dashboard alert list.
    pub dashboard_detail_limit: usize,

    /// Entries returned by `recent_activity`.
    pub recent_activity_limit: usize,

    /// Seed the two default warehouses on bootstrap when none exist.
    pub seed_default_warehouses: bool,

    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dashboard_detail_limit: 10,
            recent_activity_limit: 20,
            seed_default_warehouses: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from the optional config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("STOCKMASTER_CONFIG").unwrap_or_else(|_| DEFAULT_FILE.into());
        Self::build(Some(file), None)
    }

    /// Load from an explicit variable map instead of the process
    /// environment. No file is read.
    pub fn load_from(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::build(None, Some(vars))
    }

    fn build(file: Option<String>, vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("dashboard_detail_limit", defaults.dashboard_detail_limit as u64)?
            .set_default("recent_activity_limit", defaults.recent_activity_limit as u64)?
            .set_default("seed_default_warehouses", defaults.seed_default_warehouses)?
            .set_default("logging.filter", defaults.logging.filter)?
            .set_default("logging.json", defaults.logging.json)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(&file).required(false));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_activity_limit == 0 {
            return Err(ConfigError::Message(
                "recent_activity_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_dashboard_detail_limit(mut self, limit: usize) -> Self {
        self.dashboard_detail_limit = limit;
        self
    }

    pub fn with_recent_activity_limit(mut self, limit: usize) -> Self {
        self.recent_activity_limit = limit;
        self
    }

    pub fn without_default_warehouses(mut self) -> Self {
        self.seed_default_warehouses = false;
        self
    }
}
