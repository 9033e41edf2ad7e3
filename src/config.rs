use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MONGO_URI (or DATABASE_URL) must be set")]
    MissingDatabaseUri,
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// Server settings read from the environment (`.env` is loaded first by `main`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    /// Overrides the database named in the URI path.
    pub database_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongo_uri = non_empty("MONGO_URI")
            .or_else(|| non_empty("DATABASE_URL"))
            .ok_or(ConfigError::MissingDatabaseUri)?;

        let port = match non_empty("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => 3000,
        };

        Ok(Config {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            mongo_uri,
            database_name: non_empty("MONGO_DATABASE"),
        })
    }
}
