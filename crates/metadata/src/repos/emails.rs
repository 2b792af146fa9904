//! Email repository.

use crate::error::MetadataResult;
use crate::models::EmailRow;
use async_trait::async_trait;
use uuid::Uuid;

/// One page of a mailbox's emails, newest first, with the total count so
/// clients can page.
#[derive(Debug, Clone)]
pub struct EmailPage {
    pub emails: Vec<EmailRow>,
    pub total: u64,
}

/// Repository for stored email operations.
#[async_trait]
pub trait EmailRepo: Send + Sync {
    /// Insert a received email.
    async fn create_email(&self, email: &EmailRow) -> MetadataResult<()>;

    /// Get an email by ID.
    async fn get_email(&self, email_id: Uuid) -> MetadataResult<Option<EmailRow>>;

    /// Mark an email as read.
    async fn mark_email_read(&self, email_id: Uuid) -> MetadataResult<()>;

    /// List a page of a mailbox's emails, newest first.
    async fn list_emails(
        &self,
        mailbox_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> MetadataResult<EmailPage>;
}
