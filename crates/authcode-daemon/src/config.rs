//! Configuration for the auth code request service.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default location of the request store database.
pub const DEFAULT_DATABASE_PATH: &str = "data/auth-code-requests.db";

/// Service configuration.
///
/// Loaded from a JSON file when one is supplied, then overridden from
/// `AUTHCODE_*` environment variables. Every collaborator endpoint lives
/// here; nothing reads configuration ambiently at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Path of the SQLite request store.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Base URL of the officer directory API.
    pub directory_api_url: String,
    /// Base URL of the letter/queue API.
    pub letter_api_url: String,
    /// Path posted to on the letter/queue API.
    pub letter_api_path: String,
    /// Base URL of the notification sender (email) API.
    pub email_api_url: String,
    /// API key presented to the notification sender.
    pub email_api_key: String,
    /// Portal URL rendered into confirmation emails.
    pub portal_url: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_database_path() -> String {
    DEFAULT_DATABASE_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            directory_api_url: "http://localhost:4001".to_string(),
            letter_api_url: "http://localhost:4002".to_string(),
            letter_api_path: "/api/queue/authcode".to_string(),
            email_api_url: "http://localhost:4003".to_string(),
            email_api_key: String::new(),
            portal_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, optionally from a JSON file, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.load_from_env();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Override configuration from `AUTHCODE_*` environment variables.
    fn load_from_env(&mut self) {
        let overrides: [(&str, &mut String); 8] = [
            ("AUTHCODE_LOG_LEVEL", &mut self.log_level),
            ("AUTHCODE_DATABASE_PATH", &mut self.database_path),
            ("AUTHCODE_DIRECTORY_API_URL", &mut self.directory_api_url),
            ("AUTHCODE_LETTER_API_URL", &mut self.letter_api_url),
            ("AUTHCODE_LETTER_API_PATH", &mut self.letter_api_path),
            ("AUTHCODE_EMAIL_API_URL", &mut self.email_api_url),
            ("AUTHCODE_EMAIL_API_KEY", &mut self.email_api_key),
            ("AUTHCODE_PORTAL_URL", &mut self.portal_url),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                *slot = value;
            }
        }
    }

    /// Check every endpoint parses as a URL before any client is built.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("directory_api_url", &self.directory_api_url),
            ("letter_api_url", &self.letter_api_url),
            ("email_api_url", &self.email_api_url),
            ("portal_url", &self.portal_url),
        ] {
            Url::parse(value).with_context(|| format!("invalid {name}: {value}"))?;
        }
        Ok(())
    }
}
