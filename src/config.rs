//! # Configuration File Support
//!
//! Optional TOML loading for callers that keep board credentials in a file
//! rather than building a [`ClientConfig`](crate::ClientConfig) in code.
//!
//! The file names a mode and carries one section per credential shape;
//! only the section matching the mode is used, and a missing section for
//! the named mode is a configuration error:
//!
//! ```toml
//! mode = "local"
//!
//! [local]
//! ip_address = "192.168.1.50"
//! local_api_key = "abcdef"
//! ```
//!
//! Unlike data that can fall back to defaults, credentials have no
//! sensible default, so every load failure surfaces as
//! [`BoardError::Config`].

use crate::error::{BoardError, Result};
use crate::transport::{BoardClient, ClientConfig, LocalConfig, Mode, RwConfig, SubscriptionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk configuration: a mode plus one section per shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Which transport to build.
    pub mode: Mode,
    /// Subscription credentials, used when `mode = "subscription"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionConfig>,
    /// Read/write credentials, used when `mode = "rw"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rw: Option<RwConfig>,
    /// Local device credentials, used when `mode = "local"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalConfig>,
}

impl Config {
    /// Load and parse a configuration file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| BoardError::config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| BoardError::config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// The credential shape matching `mode`, or a configuration error if
    /// the file lacks that section. Foreign sections are ignored, never
    /// coerced.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let missing = || BoardError::config(format!("config file has no [{}] section", self.mode));
        match self.mode {
            Mode::Subscription => self
                .subscription
                .clone()
                .map(ClientConfig::Subscription)
                .ok_or_else(missing),
            Mode::Rw => self.rw.clone().map(ClientConfig::ReadWrite).ok_or_else(missing),
            Mode::Local => self.local.clone().map(ClientConfig::Local).ok_or_else(missing),
        }
    }

    /// Build the client this file describes, routing through the factory's
    /// shape validation.
    pub fn into_client(self) -> Result<BoardClient> {
        let config = self.client_config()?;
        crate::transport::create(self.mode, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_local_config() {
        let file = write_config(
            r#"
            mode = "local"

            [local]
            ip_address = "192.168.1.50"
            local_api_key = "abcdef"
            "#,
        );

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.mode, Mode::Local);
        let client = config.into_client().unwrap();
        assert_eq!(client.mode(), Mode::Local);
    }

    #[test]
    fn loads_a_subscription_config_with_fixed_id() {
        let file = write_config(
            r#"
            mode = "subscription"

            [subscription]
            api_key = "key"
            api_secret = "secret"
            subscription_id = "sub-1"
            "#,
        );

        let client = Config::load_from_path(file.path())
            .unwrap()
            .into_client()
            .unwrap();
        assert_eq!(client.mode(), Mode::Subscription);
    }

    #[test]
    fn missing_section_for_mode_is_a_config_error() {
        let file = write_config(
            r#"
            mode = "rw"

            [local]
            ip_address = "192.168.1.50"
            local_api_key = "abcdef"
            "#,
        );

        let err = Config::load_from_path(file.path())
            .unwrap()
            .into_client()
            .unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
        assert!(err.to_string().contains("[rw]"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load_from_path("/nonexistent/board.toml").unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let file = write_config("mode = ");
        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            mode: Mode::Rw,
            subscription: None,
            rw: Some(RwConfig {
                api_read_write_key: "rw-key".into(),
            }),
            local: None,
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.mode, Mode::Rw);
        assert_eq!(parsed.rw.unwrap().api_read_write_key, "rw-key");
    }
}
