//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Mailbox record.
#[derive(Debug, Clone, FromRow)]
pub struct MailboxRow {
    pub mailbox_id: Uuid,
    /// Full address, unique across the table.
    pub address: String,
    pub created_at: OffsetDateTime,
    /// Present for future retention; written as NULL and never read.
    pub expires_at: Option<OffsetDateTime>,
    pub is_active: bool,
}

/// Stored email record.
#[derive(Debug, Clone, FromRow)]
pub struct EmailRow {
    pub email_id: Uuid,
    pub mailbox_id: Uuid,
    pub from_address: String,
    pub from_name: Option<String>,
    pub subject: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub received_at: OffsetDateTime,
    pub is_read: bool,
}
