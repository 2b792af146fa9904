//! Application state shared across handlers.

use driftmail_core::config::AppConfig;
use driftmail_mail::Sender;
use driftmail_metadata::MailStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MailStore>,
    /// Transactional send client (None when no API key is configured).
    pub sender: Option<Arc<Sender>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Panics
    ///
    /// Panics if the mail configuration is invalid.
    pub fn new(config: AppConfig, metadata: Arc<dyn MailStore>) -> Self {
        if let Err(error) = config.mail.validate() {
            panic!("Invalid mail configuration: {error}");
        }

        let sender = config.mail.send_api_key.as_ref().map(|key| {
            Arc::new(Sender::new(config.mail.send_api_url.clone(), key.clone()))
        });
        if sender.is_none() {
            tracing::warn!("No send API key configured, /api/emails/send is disabled");
        }

        Self {
            config: Arc::new(config),
            metadata,
            sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftmail_metadata::SqliteStore;

    async fn build_state(config: AppConfig) -> (tempfile::TempDir, AppState) {
        let temp = tempfile::tempdir().unwrap();
        let metadata: Arc<dyn MailStore> = Arc::new(
            SqliteStore::new(temp.path().join("metadata.db"))
                .await
                .unwrap(),
        );
        let state = AppState::new(config, metadata);
        (temp, state)
    }

    #[tokio::test]
    async fn sender_absent_without_api_key() {
        let (_temp, state) = build_state(AppConfig::for_testing()).await;
        assert!(state.sender.is_none());
    }

    #[tokio::test]
    async fn sender_present_with_api_key() {
        let mut config = AppConfig::for_testing();
        config.mail.send_api_key = Some("re_test_key".to_string());

        let (_temp, state) = build_state(config).await;
        assert!(state.sender.is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "Invalid mail configuration")]
    async fn invalid_domain_panics() {
        let mut config = AppConfig::for_testing();
        config.mail.domain = String::new();
        build_state(config).await;
    }
}
