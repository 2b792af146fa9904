//! Inbound email ingestion.
//!
//! Two trigger shapes arrive here: a structured routing webhook with
//! pre-parsed fields, and the native mail-routing event carrying raw RFC 822
//! bytes. Both normalize into [`InboundMessage`] and converge on
//! [`deliver`], the single insert path.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::new_mailbox_row;
use crate::metrics::EMAILS_RECEIVED;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use driftmail_core::{InboundMessage, MailboxAddress};
use driftmail_metadata::MetadataError;
use driftmail_metadata::models::{EmailRow, MailboxRow};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Structured routing webhook payload. Field names follow the routing
/// provider's header-cased JSON.
#[derive(Debug, Deserialize)]
pub struct RoutingWebhook {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Subject", default)]
    pub subject: Option<String>,
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
    #[serde(rename = "Text-Only", default)]
    pub text_only: Option<String>,
    #[serde(rename = "HTML", default)]
    pub html: Option<String>,
    #[serde(rename = "HTML-Only", default)]
    pub html_only: Option<String>,
}

/// Envelope parameters for the raw ingestion trigger.
#[derive(Debug, Deserialize)]
pub struct IngestQuery {
    /// Envelope recipient.
    pub to: String,
    /// Envelope sender.
    pub from: String,
}

/// Response for both ingestion triggers.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/email/receive - Structured webhook trigger.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<RoutingWebhook>,
) -> ApiResult<Json<IngestResponse>> {
    let recipient = parse_recipient(&state, &payload.to)?;

    let message = InboundMessage {
        from_address: payload.from,
        from_name: None,
        subject: payload.subject,
        html_body: payload.html.or(payload.html_only),
        text_body: payload.text.or(payload.text_only),
    };

    let created = deliver(&state, &recipient, message).await?;
    Ok(Json(IngestResponse {
        success: true,
        message: if created {
            "email received and mailbox created"
        } else {
            "email received"
        },
    }))
}

/// POST /api/email/ingest?to=&from= - Native mail-routing trigger carrying
/// the raw RFC 822 message in the body.
pub async fn ingest_raw(
    State(state): State<AppState>,
    Query(query): Query<IngestQuery>,
    body: Bytes,
) -> ApiResult<Json<IngestResponse>> {
    let recipient = parse_recipient(&state, &query.to)?;

    let message = driftmail_mail::parse_inbound(&body, &query.from);

    let created = deliver(&state, &recipient, message).await?;
    Ok(Json(IngestResponse {
        success: true,
        message: if created {
            "email received and mailbox created"
        } else {
            "email received"
        },
    }))
}

/// Validate a recipient and check it belongs to the configured domain.
fn parse_recipient(state: &AppState, raw: &str) -> ApiResult<MailboxAddress> {
    let address = MailboxAddress::parse(raw)
        .map_err(|e| ApiError::BadRequest(format!("invalid recipient: {e}")))?;

    if !address.in_domain(&state.config.mail.domain) {
        return Err(ApiError::BadRequest(format!(
            "recipient domain '{}' is not served here",
            address.domain()
        )));
    }

    Ok(address)
}

/// Store an inbound message, auto-creating the recipient mailbox when it
/// does not exist yet. Returns whether a mailbox was created.
async fn deliver(
    state: &AppState,
    recipient: &MailboxAddress,
    message: InboundMessage,
) -> ApiResult<bool> {
    let (mailbox, created) = resolve_mailbox(state, recipient).await?;

    let email = EmailRow {
        email_id: Uuid::new_v4(),
        mailbox_id: mailbox.mailbox_id,
        from_address: message.from_address,
        from_name: message.from_name,
        subject: message.subject,
        html_body: message.html_body,
        text_body: message.text_body,
        received_at: OffsetDateTime::now_utc(),
        is_read: false,
    };
    state.metadata.create_email(&email).await?;

    EMAILS_RECEIVED.inc();
    tracing::info!(
        mailbox_id = %mailbox.mailbox_id,
        recipient = %recipient,
        email_id = %email.email_id,
        mailbox_created = created,
        "inbound email stored"
    );

    Ok(created)
}

/// Find the recipient mailbox, creating it when absent. A concurrent create
/// for the same address loses the unique-constraint race and re-fetches.
async fn resolve_mailbox(
    state: &AppState,
    recipient: &MailboxAddress,
) -> ApiResult<(MailboxRow, bool)> {
    if let Some(mailbox) = state
        .metadata
        .get_mailbox_by_address(&recipient.to_string())
        .await?
    {
        return Ok((mailbox, false));
    }

    let row = new_mailbox_row(recipient);
    match state.metadata.create_mailbox(&row).await {
        Ok(()) => Ok((row, true)),
        Err(MetadataError::AlreadyExists(_)) => {
            let mailbox = state
                .metadata
                .get_mailbox_by_address(&recipient.to_string())
                .await?
                .ok_or_else(|| {
                    ApiError::Internal(format!("mailbox for '{recipient}' vanished mid-create"))
                })?;
            Ok((mailbox, false))
        }
        Err(e) => Err(e.into()),
    }
}
