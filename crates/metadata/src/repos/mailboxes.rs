//! Mailbox repository.

use crate::error::MetadataResult;
use crate::models::MailboxRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for mailbox operations.
#[async_trait]
pub trait MailboxRepo: Send + Sync {
    /// Create a new mailbox. Returns [`MetadataError::AlreadyExists`] when the
    /// address collides with an existing row.
    ///
    /// [`MetadataError::AlreadyExists`]: crate::MetadataError::AlreadyExists
    async fn create_mailbox(&self, mailbox: &MailboxRow) -> MetadataResult<()>;

    /// Get a mailbox by ID.
    async fn get_mailbox(&self, mailbox_id: Uuid) -> MetadataResult<Option<MailboxRow>>;

    /// Get a mailbox by its full address.
    async fn get_mailbox_by_address(&self, address: &str) -> MetadataResult<Option<MailboxRow>>;

    /// List active mailboxes, newest first.
    async fn list_mailboxes(&self) -> MetadataResult<Vec<MailboxRow>>;

    /// Delete a mailbox and, by cascade, its emails.
    async fn delete_mailbox(&self, mailbox_id: Uuid) -> MetadataResult<()>;
}
