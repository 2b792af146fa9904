//! Normalized message models shared by the ingestion and send paths.

use serde::{Deserialize, Serialize};

/// An inbound message normalized from either trigger shape (structured
/// webhook or raw RFC 822 event) into the form the storage layer accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender address as reported by the trigger.
    pub from_address: String,
    /// Sender display name, when the payload carried one.
    pub from_name: Option<String>,
    pub subject: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
}

impl InboundMessage {
    /// Create a message with only a sender; the remaining fields default
    /// to absent.
    pub fn from_sender(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
            from_name: None,
            subject: None,
            html_body: None,
            text_body: None,
        }
    }

    /// Whether the message carries any renderable body.
    pub fn has_body(&self) -> bool {
        self.html_body.as_deref().is_some_and(|b| !b.is_empty())
            || self.text_body.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// An outbound message handed to the transactional send API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_sender_defaults() {
        let msg = InboundMessage::from_sender("a@b.test");
        assert_eq!(msg.from_address, "a@b.test");
        assert!(msg.subject.is_none());
        assert!(!msg.has_body());
    }

    #[test]
    fn has_body_ignores_empty_strings() {
        let mut msg = InboundMessage::from_sender("a@b.test");
        msg.html_body = Some(String::new());
        assert!(!msg.has_body());
        msg.text_body = Some("hello".to_string());
        assert!(msg.has_body());
    }
}
