//! Service configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turnstile_core::Phone;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration parsed but a value is unusable.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

fn default_challenge_ttl_secs() -> u64 {
    300
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

/// Deployment configuration for the ticketing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Deployment-wide identity binding secret. Changing it orphans every
    /// previously minted identity token.
    pub binding_secret: String,

    /// Scan→confirm and login-code window in seconds (default 300).
    #[serde(default = "default_challenge_ttl_secs")]
    pub challenge_ttl_secs: u64,

    /// Session credential lifetime in seconds (default 86400).
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Phone granted admin privileges on login, if any.
    #[serde(default)]
    pub admin_phone: Option<String>,

    /// Whether generated codes are disclosed in boundary responses.
    /// Off in production; codes normally leave via SMS.
    #[serde(default)]
    pub reveal_codes: bool,
}

impl ServiceConfig {
    /// Creates a configuration with defaults for everything but the
    /// binding secret.
    pub fn new(binding_secret: impl Into<String>) -> Self {
        Self {
            binding_secret: binding_secret.into(),
            challenge_ttl_secs: default_challenge_ttl_secs(),
            session_ttl_secs: default_session_ttl_secs(),
            admin_phone: None,
            reveal_codes: false,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.binding_secret.is_empty() {
            return Err(ConfigError::Validation(
                "binding_secret must not be empty".to_string(),
            ));
        }
        if self.challenge_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "challenge_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(phone) = &self.admin_phone {
            Phone::parse(phone.clone())
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }
        Ok(())
    }

    /// Parsed admin phone, if configured.
    pub fn admin_phone(&self) -> Option<Phone> {
        self.admin_phone
            .as_ref()
            .and_then(|p| Phone::parse(p.clone()).ok())
    }

    /// Scan→confirm window as a duration.
    pub fn challenge_ttl(&self) -> Duration {
        Duration::from_secs(self.challenge_ttl_secs)
    }

    /// Session lifetime as a duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ServiceConfig::from_toml(r#"binding_secret = "s3cret""#).unwrap();
        assert_eq!(config.challenge_ttl_secs, 300);
        assert_eq!(config.session_ttl_secs, 86_400);
        assert!(config.admin_phone.is_none());
        assert!(!config.reveal_codes);
    }

    #[test]
    fn full_config_parses() {
        let config = ServiceConfig::from_toml(
            r#"
            binding_secret = "s3cret"
            challenge_ttl_secs = 120
            session_ttl_secs = 3600
            admin_phone = "9876543210"
            reveal_codes = true
            "#,
        )
        .unwrap();
        assert_eq!(config.challenge_ttl_secs, 120);
        assert_eq!(config.admin_phone().unwrap().as_str(), "9876543210");
        assert!(config.reveal_codes);
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            ServiceConfig::from_toml(r#"binding_secret = """#),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn malformed_admin_phone_is_rejected() {
        let toml = r#"
            binding_secret = "s3cret"
            admin_phone = "12345"
        "#;
        assert!(matches!(
            ServiceConfig::from_toml(toml),
            Err(ConfigError::Validation(_))
        ));
    }
}
