use crate::database::DatabaseConfig;
use crate::evaluation::EvaluationConfig;
use crate::server::config::{LoggingConfig, MetricsConfig, ServerConfig};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "SUBAUDIT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(environment());

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(environment());

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluation
            .validate()
            .map_err(|e| ConfigError::Message(format!("evaluation: {}", e)))?;

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
