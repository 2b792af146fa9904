//! Transactional send API client.
//!
//! Sending is delegated to a Resend-compatible HTTP API: the client POSTs a
//! JSON payload to `<api_url>/emails` with a bearer key and reads the
//! provider-assigned id back.

use crate::error::{MailError, MailResult};
use driftmail_core::OutboundMessage;
use serde::{Deserialize, Serialize};

/// Wire payload for the send API.
#[derive(Debug, Serialize)]
struct SendPayload {
    from: String,
    to: String,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Successful send API response.
#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Provider receipt for a delivered message.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Provider-assigned message id.
    pub id: Option<String>,
}

/// Client for a Resend-compatible transactional send API.
pub struct Sender {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl Sender {
    /// Create a new sender against the given API base URL.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Deliver an outbound message, filling body fallbacks first.
    pub async fn send(&self, message: &OutboundMessage) -> MailResult<DeliveryReceipt> {
        let payload = normalize_payload(message);

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %detail, "send API rejected message");
            return Err(MailError::Delivery {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SendResponse = response.json().await?;
        Ok(DeliveryReceipt { id: body.id })
    }
}

/// Fill the html/text fallbacks the send API expects: a missing HTML body
/// falls back to the text body, and a missing text body to a tag-stripped
/// rendering of the HTML one.
fn normalize_payload(message: &OutboundMessage) -> SendPayload {
    let html = message.html.clone().or_else(|| message.text.clone());
    let text = message
        .text
        .clone()
        .or_else(|| message.html.as_deref().map(strip_tags));

    SendPayload {
        from: message.from.clone(),
        to: message.to.clone(),
        subject: message.subject.clone(),
        html,
        text,
    }
}

/// Drop `<...>` tag spans from an HTML fragment.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(html: Option<&str>, text: Option<&str>) -> OutboundMessage {
        OutboundMessage {
            from: "noreply@drift.test".to_string(),
            to: "someone@example.com".to_string(),
            subject: "subject".to_string(),
            html: html.map(str::to_string),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn strip_tags_drops_markup() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("<br/>"), "");
    }

    #[test]
    fn html_falls_back_to_text() {
        let payload = normalize_payload(&message(None, Some("plain")));
        assert_eq!(payload.html.as_deref(), Some("plain"));
        assert_eq!(payload.text.as_deref(), Some("plain"));
    }

    #[test]
    fn text_falls_back_to_stripped_html() {
        let payload = normalize_payload(&message(Some("<p>rich</p>"), None));
        assert_eq!(payload.html.as_deref(), Some("<p>rich</p>"));
        assert_eq!(payload.text.as_deref(), Some("rich"));
    }

    #[test]
    fn both_bodies_pass_through() {
        let payload = normalize_payload(&message(Some("<p>a</p>"), Some("b")));
        assert_eq!(payload.html.as_deref(), Some("<p>a</p>"));
        assert_eq!(payload.text.as_deref(), Some("b"));
    }

    #[test]
    fn sender_trims_trailing_slash() {
        let sender = Sender::new("https://api.example.com/", "key");
        assert_eq!(sender.api_url, "https://api.example.com");
    }
}
