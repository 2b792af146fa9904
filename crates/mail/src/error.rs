//! Error types for the mail edges.

use thiserror::Error;

/// Errors from parsing or delivering mail.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("send API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("send API rejected the message ({status}): {detail}")]
    Delivery { status: u16, detail: String },
}

/// Result type for mail operations.
pub type MailResult<T> = std::result::Result<T, MailError>;
