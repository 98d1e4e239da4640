//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from palaver.toml)
//! - `~/.config/palaver/palaver.toml`
//! - `./palaver.toml`
//! - `DATABASE_*` environment variables (database section only)

use config::{Config, File, FileFormat};
use palaver_error::{ConfigError, ConfigErrorKind, PalaverResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[cfg(feature = "database")]
use palaver_database::DatabaseConfig;

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../palaver.toml");

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PalaverConfig {
    /// PostgreSQL connection settings
    #[cfg(feature = "database")]
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PalaverConfig {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration file cannot be parsed.
    pub fn load() -> PalaverResult<Self> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/palaver/palaver.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("palaver").required(false));

        Self::build(builder).map(Self::with_env_overrides)
    }

    /// Load configuration from a single file layered over the bundled defaults.
    ///
    /// `DATABASE_*` environment variables still override the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> PalaverResult<Self> {
        Self::from_file_with(path, Self::with_env_overrides)
    }

    fn from_file_with<F>(path: impl AsRef<Path>, overrides: F) -> PalaverResult<Self>
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::build(builder).map(overrides)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> PalaverResult<Self> {
        let config = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Build(e.to_string())))?;

        Ok(config
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?)
    }

    #[cfg(feature = "database")]
    fn with_env_overrides(mut self) -> Self {
        self.database = self.database.with_env_overrides();
        self
    }

    #[cfg(not(feature = "database"))]
    fn with_env_overrides(self) -> Self {
        self
    }
}
