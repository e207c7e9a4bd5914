//! Client configuration
//!
//! `ClientConfig` tells the transport where the DenseEdia service lives. It can be
//! built from defaults, overridden by the `DENSEDIA_API_URL` environment variable, or
//! loaded from a JSON file. Missing files and missing fields fall back to defaults so
//! older config files keep loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`ClientConfig::api_url`]
pub const API_URL_ENV: &str = "DENSEDIA_API_URL";

const DEFAULT_API_URL: &str = "http://127.0.0.1:59130";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Configuration for reaching the DenseEdia service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every resource path is appended to
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with `DENSEDIA_API_URL` applied when set and non-empty
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        config
    }

    /// Load configuration from a JSON file
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` - Parsed configuration, or defaults if the file doesn't exist
    /// * `Err(String)` - The file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!("No client config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read client config: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse client config: {}", e))
    }

    /// Base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("api_url cannot be empty".to_string());
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:59130");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api_url = String::new();
        assert!(config.validate().is_err());

        config.api_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://edia.example.org/api/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "https://edia.example.org/api");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::load(&temp_dir.path().join("client.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.json");

        std::fs::write(&path, r#"{"api_url": "http://10.0.0.2:8000"}"#).unwrap();
        assert_eq!(
            ClientConfig::load(&path).unwrap().api_url,
            "http://10.0.0.2:8000"
        );

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(ClientConfig::load(&path).unwrap(), ClientConfig::default());

        std::fs::write(&path, "not json").unwrap();
        assert!(ClientConfig::load(&path).is_err());
    }
}
