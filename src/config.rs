use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Qiita API
    pub api_base: String,
    pub user: String,

    // Output
    pub snapshot_path: PathBuf,
    pub articles_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: env_or_default("QIITA_API_BASE", "https://qiita.com/api/v2"),
            user: required_env("QIITA_USER")?,
            snapshot_path: PathBuf::from(env_or_default("SNAPSHOT_PATH", "./data/pages.json")),
            articles_dir: PathBuf::from(env_or_default("ARTICLES_DIR", "./articles")),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "QIITA_API_BASE".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.user.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "QIITA_USER".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Build the listing URL for one page of the user's items.
    #[must_use]
    pub fn items_url(&self, page: u32) -> String {
        format!(
            "{}/users/{}/items?page={page}",
            self.api_base.trim_end_matches('/'),
            self.user
        )
    }

    /// A configuration with placeholder values for integration tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base: "http://127.0.0.1:0".to_string(),
            user: "testuser".to_string(),
            snapshot_path: PathBuf::from("./data/pages.json"),
            articles_dir: PathBuf::from("./articles"),
        }
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}
