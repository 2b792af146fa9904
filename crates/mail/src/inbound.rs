//! Raw RFC 822 parsing for the native mail-routing trigger.
//!
//! The structured webhook trigger arrives pre-parsed; this module handles the
//! other shape, where the event carries the raw message bytes and only the
//! envelope sender/recipient. Parsing is delegated to `mail-parser` and the
//! result is normalized into [`InboundMessage`].

use driftmail_core::InboundMessage;
use mail_parser::{HeaderValue, Message};

/// Subject stored when the payload has no Subject header.
pub const NO_SUBJECT: &str = "(No Subject)";

/// Parse raw RFC 822 bytes into a normalized inbound message.
///
/// `envelope_from` is the SMTP envelope sender; the header From overrides it
/// when the payload carries one. An unparseable payload degrades to a
/// placeholder message instead of failing the delivery, so the platform does
/// not retry a permanently broken payload.
pub fn parse_inbound(raw: &[u8], envelope_from: &str) -> InboundMessage {
    let Some(parsed) = Message::parse(raw) else {
        tracing::warn!(
            envelope_from = %envelope_from,
            bytes = raw.len(),
            "failed to parse inbound message"
        );
        let mut message = InboundMessage::from_sender(envelope_from);
        message.subject = Some("Error parsing email content".to_string());
        message.text_body = Some("The message body could not be parsed.".to_string());
        return message;
    };

    let (from_name, from_address) = first_address(parsed.from());

    let subject = parsed
        .subject()
        .map(str::to_string)
        .unwrap_or_else(|| NO_SUBJECT.to_string());

    let text_body = parsed
        .body_text(0)
        .map(|b| b.into_owned())
        .filter(|b| !b.is_empty());
    let mut html_body = parsed
        .body_html(0)
        .map(|b| b.into_owned())
        .filter(|b| !b.is_empty());

    // Text-only messages get a minimal HTML rendering for the frontend.
    if html_body.is_none()
        && let Some(text) = text_body.as_deref()
    {
        html_body = Some(format!("<pre>{}</pre>", escape_html(text)));
    }

    InboundMessage {
        from_address: from_address.unwrap_or_else(|| envelope_from.to_string()),
        from_name,
        subject: Some(subject),
        html_body,
        text_body,
    }
}

/// Extract the first (name, address) pair from a From header value.
fn first_address(value: &HeaderValue<'_>) -> (Option<String>, Option<String>) {
    fn parts(addr: &mail_parser::Addr<'_>) -> (Option<String>, Option<String>) {
        (
            addr.name.as_deref().map(str::to_string),
            addr.address.as_deref().map(str::to_string),
        )
    }

    match value {
        HeaderValue::Address(addr) => parts(addr),
        HeaderValue::AddressList(list) => list.first().map(parts).unwrap_or_default(),
        HeaderValue::Group(group) => group.addresses.first().map(parts).unwrap_or_default(),
        HeaderValue::GroupList(groups) => groups
            .iter()
            .find_map(|g| g.addresses.first())
            .map(parts)
            .unwrap_or_default(),
        _ => (None, None),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &[u8] = b"From: Alice Example <alice@example.com>\r\n\
To: box@drift.test\r\n\
Subject: Greetings\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Hello there & <welcome>\r\n";

    #[test]
    fn parses_plain_text_message() {
        let message = parse_inbound(PLAIN, "envelope@example.com");
        assert_eq!(message.from_address, "alice@example.com");
        assert_eq!(message.from_name.as_deref(), Some("Alice Example"));
        assert_eq!(message.subject.as_deref(), Some("Greetings"));
        assert!(
            message
                .text_body
                .as_deref()
                .unwrap()
                .contains("Hello there")
        );
    }

    #[test]
    fn text_only_message_gets_escaped_html_rendering() {
        let message = parse_inbound(PLAIN, "envelope@example.com");
        let html = message.html_body.unwrap();
        assert!(html.starts_with("<pre>"));
        assert!(html.contains("&amp; &lt;welcome&gt;"));
    }

    #[test]
    fn missing_from_header_falls_back_to_envelope() {
        let raw = b"Subject: No sender\r\n\r\nbody\r\n";
        let message = parse_inbound(raw, "envelope@example.com");
        assert_eq!(message.from_address, "envelope@example.com");
        assert_eq!(message.subject.as_deref(), Some("No sender"));
    }

    #[test]
    fn missing_subject_becomes_placeholder() {
        let raw = b"From: a@example.com\r\n\r\nbody\r\n";
        let message = parse_inbound(raw, "envelope@example.com");
        assert_eq!(message.subject.as_deref(), Some(NO_SUBJECT));
    }

    #[test]
    fn html_part_is_preferred_over_synthesized() {
        let raw = b"From: a@example.com\r\n\
Subject: Html\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>rich body</p>\r\n";
        let message = parse_inbound(raw, "envelope@example.com");
        let html = message.html_body.unwrap();
        assert!(html.contains("<p>rich body</p>"));
        assert!(!html.starts_with("<pre>"));
    }

    #[test]
    fn escape_html_covers_specials() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
    }
}
