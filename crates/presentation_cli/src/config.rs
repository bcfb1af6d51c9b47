//! CLI configuration loading
//!
//! Settings come from an optional TOML file and `NEXT_DEPARTURE_*`
//! environment variables, e.g. `NEXT_DEPARTURE_TRAVELINE__API_KEY`.
//! Environment variables win over the file.

use std::path::Path;

use integration_traveline::TravelineConfig;
use serde::Deserialize;

/// Environment variable prefix
const ENV_PREFIX: &str = "NEXT_DEPARTURE";

/// Top-level CLI configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Traveline SIRI endpoint and credentials
    #[serde(default)]
    pub traveline: TravelineConfig,
}

impl AppConfig {
    /// Load configuration from `path` (or `config.toml` if present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
