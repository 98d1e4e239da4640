//! Connection settings for PostgreSQL.

use palaver_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use serde::{Deserialize, Serialize};

/// Where and how to connect to PostgreSQL.
///
/// A complete `url` wins over the component fields. Environment variables
/// override whatever was loaded from configuration files.
///
/// # Example
///
/// ```toml
/// [database]
/// host = "db.internal"
/// port = 5432
/// name = "palaver"
/// user = "palaver"
/// pool_max_size = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Full connection URL (overrides the component fields)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// PostgreSQL username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// PostgreSQL password
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Database host
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name
    #[serde(default = "default_name")]
    pub name: String,

    /// Maximum connections held by the pool
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_name() -> String {
    "palaver".to_string()
}

fn default_pool_max_size() -> u32 {
    8
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            password: None,
            host: default_host(),
            port: default_port(),
            name: default_name(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl DatabaseConfig {
    /// Apply overrides from the process environment.
    ///
    /// Reads `DATABASE_URL`, `DATABASE_USER`, `DATABASE_PASSWORD`,
    /// `DATABASE_HOST`, `DATABASE_PORT` and `DATABASE_NAME`. Loads `.env`
    /// first if present.
    pub fn with_env_overrides(self) -> Self {
        let _ = dotenvy::dotenv();
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.url = Some(url);
        }
        if let Some(user) = lookup("DATABASE_USER") {
            self.user = Some(user);
        }
        if let Some(password) = lookup("DATABASE_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(host) = lookup("DATABASE_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DATABASE_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.name = name;
        }
        self
    }

    /// Connection URL for these settings.
    ///
    /// # Errors
    ///
    /// Returns a `Connection` error if no `url` is set and either the user
    /// or the password is missing.
    pub fn database_url(&self) -> DatabaseResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let user = self.user.as_deref().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "DATABASE_USER environment variable not set".to_string(),
            ))
        })?;
        let password = self.password.as_deref().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "DATABASE_PASSWORD environment variable not set".to_string(),
            ))
        })?;

        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            user, password, self.host, self.port, self.name
        ))
    }
}
