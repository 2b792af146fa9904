//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Default page size for email listings.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Maximum page size a client may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
    /// Directory of static frontend assets. When unset, no frontend is served.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    200
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            metrics_enabled: default_metrics_enabled(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Clamp a requested page size to the configured bounds.
    pub fn clamp_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

/// Mail domain and delivery configuration.
///
/// `domain` is required: inbound recipients outside it are rejected and
/// generated addresses are minted under it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MailConfig {
    /// Domain that mailbox addresses live under (e.g., "drift.example").
    pub domain: String,
    /// API key for the transactional send API. Sending is disabled when unset.
    #[serde(default)]
    pub send_api_key: Option<String>,
    /// Base URL of the send API.
    #[serde(default = "default_send_api_url")]
    pub send_api_url: String,
    /// Default sender address; falls back to `noreply@<domain>` when unset.
    #[serde(default)]
    pub default_sender: Option<String>,
}

fn default_send_api_url() -> String {
    "https://api.resend.com".to_string()
}

impl MailConfig {
    /// Validate the mail configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.domain.is_empty() {
            return Err(crate::Error::Config("mail.domain must be set".to_string()));
        }
        if self.domain.contains('@') || self.domain.chars().any(char::is_whitespace) {
            return Err(crate::Error::Config(format!(
                "mail.domain '{}' is not a bare domain name",
                self.domain
            )));
        }
        Ok(())
    }

    /// The sender used when a send request omits `from`.
    pub fn sender_fallback(&self) -> String {
        self.default_sender
            .clone()
            .unwrap_or_else(|| format!("noreply@{}", self.domain))
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_metadata_path")]
    pub path: PathBuf,
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("./data/driftmail.db")
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            path: default_metadata_path(),
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Mail domain and delivery configuration (required).
    pub mail: MailConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses an in-tree SQLite path and a dummy domain.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            mail: MailConfig {
                domain: "drift.test".to_string(),
                send_api_key: None,
                send_api_url: default_send_api_url(),
                default_sender: None,
            },
            metadata: MetadataConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_page_size_bounds() {
        let config = ServerConfig::default();
        assert_eq!(config.clamp_page_size(None), 50);
        assert_eq!(config.clamp_page_size(Some(0)), 1);
        assert_eq!(config.clamp_page_size(Some(10_000)), 200);
        assert_eq!(config.clamp_page_size(Some(25)), 25);
    }

    #[test]
    fn mail_config_validation() {
        let mut config = AppConfig::for_testing().mail;
        config.validate().unwrap();

        config.domain = String::new();
        assert!(config.validate().is_err());

        config.domain = "user@drift.test".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn sender_fallback_uses_domain() {
        let mut config = AppConfig::for_testing().mail;
        assert_eq!(config.sender_fallback(), "noreply@drift.test");

        config.default_sender = Some("hello@drift.test".to_string());
        assert_eq!(config.sender_fallback(), "hello@drift.test");
    }
}
