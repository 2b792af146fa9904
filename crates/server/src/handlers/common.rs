//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use driftmail_core::MailboxAddress;
use driftmail_metadata::models::MailboxRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Build a fresh mailbox row for an address.
///
/// `expires_at` is left NULL: retention is out of scope, the column only
/// reserves the shape.
pub fn new_mailbox_row(address: &MailboxAddress) -> MailboxRow {
    MailboxRow {
        mailbox_id: Uuid::new_v4(),
        address: address.to_string(),
        created_at: OffsetDateTime::now_utc(),
        expires_at: None,
        is_active: true,
    }
}

/// Format a timestamp for API responses.
pub fn format_timestamp(ts: OffsetDateTime) -> ApiResult<String> {
    ts.format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format timestamp: {e}")))
}

/// Parse a path segment as a UUID.
pub fn parse_id(raw: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("invalid {what} ID: {e}")))
}
