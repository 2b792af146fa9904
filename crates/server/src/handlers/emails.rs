//! Email read and send endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_timestamp, parse_id};
use crate::metrics::{EMAILS_SENT, SEND_FAILURES};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use driftmail_core::OutboundMessage;
use driftmail_metadata::models::EmailRow;
use serde::{Deserialize, Serialize};

/// Email details (used by list and get responses).
#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub email_id: String,
    pub mailbox_id: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub subject: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub received_at: String,
    pub is_read: bool,
}

/// Response wrapping a single email.
#[derive(Debug, Serialize)]
pub struct EmailEnvelope {
    pub email: EmailResponse,
}

/// Pagination query parameters for email listings.
#[derive(Debug, Deserialize)]
pub struct ListEmailsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// One page of a mailbox's emails.
#[derive(Debug, Serialize)]
pub struct ListEmailsResponse {
    pub emails: Vec<EmailResponse>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

fn email_row_to_response(email: EmailRow) -> ApiResult<EmailResponse> {
    let received_at = format_timestamp(email.received_at)?;

    Ok(EmailResponse {
        email_id: email.email_id.to_string(),
        mailbox_id: email.mailbox_id.to_string(),
        from_address: email.from_address,
        from_name: email.from_name,
        subject: email.subject,
        html_body: email.html_body,
        text_body: email.text_body,
        received_at,
        is_read: email.is_read,
    })
}

/// GET /api/mailboxes/{mailbox_id}/emails - Paginated inbox listing,
/// newest first.
pub async fn list_emails(
    State(state): State<AppState>,
    Path(mailbox_id): Path<String>,
    Query(query): Query<ListEmailsQuery>,
) -> ApiResult<Json<ListEmailsResponse>> {
    let mailbox_id = parse_id(&mailbox_id, "mailbox")?;

    // 404 for unknown mailboxes lets the polling frontend notice deletion.
    state
        .metadata
        .get_mailbox(mailbox_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("mailbox not found".to_string()))?;

    let limit = state.config.server.clamp_page_size(query.limit);
    let offset = query.offset.unwrap_or(0);

    let page = state.metadata.list_emails(mailbox_id, limit, offset).await?;
    let emails = page
        .emails
        .into_iter()
        .map(email_row_to_response)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(ListEmailsResponse {
        emails,
        total: page.total,
        limit,
        offset,
    }))
}

/// GET /api/emails/{email_id} - Fetch a single email, marking it read.
pub async fn get_email(
    State(state): State<AppState>,
    Path(email_id): Path<String>,
) -> ApiResult<Json<EmailEnvelope>> {
    let email_id = parse_id(&email_id, "email")?;

    let mut email = state
        .metadata
        .get_email(email_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("email not found".to_string()))?;

    if !email.is_read {
        state.metadata.mark_email_read(email_id).await?;
        email.is_read = true;
    }

    Ok(Json(EmailEnvelope {
        email: email_row_to_response(email)?,
    }))
}

/// Request to send an email through the transactional API.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub from: Option<String>,
}

/// Response from a successful send.
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub id: Option<String>,
}

/// POST /api/emails/send - Forward an email to the send API.
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> ApiResult<Json<SendEmailResponse>> {
    if request.to.trim().is_empty() || request.subject.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "missing required fields: to, subject".to_string(),
        ));
    }

    let Some(sender) = state.sender.as_ref() else {
        return Err(ApiError::SendingUnavailable);
    };

    let message = OutboundMessage {
        from: request
            .from
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| state.config.mail.sender_fallback()),
        to: request.to,
        subject: request.subject,
        html: request.html,
        text: request.text,
    };

    let receipt = match sender.send(&message).await {
        Ok(receipt) => receipt,
        Err(e) => {
            SEND_FAILURES.inc();
            tracing::warn!(to = %message.to, error = %e, "send failed");
            return Err(e.into());
        }
    };

    EMAILS_SENT.inc();
    tracing::info!(to = %message.to, id = ?receipt.id, "email sent");

    Ok(Json(SendEmailResponse {
        success: true,
        id: receipt.id,
    }))
}
