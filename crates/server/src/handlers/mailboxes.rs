//! Mailbox lifecycle endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_timestamp, new_mailbox_row, parse_id};
use crate::metrics::MAILBOXES_CREATED;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use driftmail_core::{ADDRESS_GENERATION_ATTEMPTS, MailboxAddress};
use driftmail_metadata::MetadataError;
use driftmail_metadata::models::MailboxRow;
use serde::Serialize;

/// Mailbox details (used by all mailbox responses).
#[derive(Debug, Serialize)]
pub struct MailboxResponse {
    pub mailbox_id: String,
    pub address: String,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub is_active: bool,
}

/// Response wrapping a single mailbox.
#[derive(Debug, Serialize)]
pub struct MailboxEnvelope {
    pub mailbox: MailboxResponse,
}

/// Response for listing mailboxes.
#[derive(Debug, Serialize)]
pub struct ListMailboxesResponse {
    pub mailboxes: Vec<MailboxResponse>,
}

/// Response for deleting a mailbox.
#[derive(Debug, Serialize)]
pub struct DeleteMailboxResponse {
    pub success: bool,
}

pub(crate) fn mailbox_row_to_response(mailbox: MailboxRow) -> ApiResult<MailboxResponse> {
    let created_at = format_timestamp(mailbox.created_at)?;
    let expires_at = mailbox.expires_at.map(format_timestamp).transpose()?;

    Ok(MailboxResponse {
        mailbox_id: mailbox.mailbox_id.to_string(),
        address: mailbox.address,
        created_at,
        expires_at,
        is_active: mailbox.is_active,
    })
}

/// POST /api/mailboxes - Mint a mailbox under a freshly generated address.
///
/// Address generation is collision-checked against the unique address column
/// with a bounded number of attempts; each retry inserts the candidate it
/// just generated.
pub async fn create_mailbox(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<MailboxEnvelope>)> {
    let domain = &state.config.mail.domain;

    for _attempt in 0..ADDRESS_GENERATION_ATTEMPTS {
        let address = MailboxAddress::generate(domain)?;
        let row = new_mailbox_row(&address);

        match state.metadata.create_mailbox(&row).await {
            Ok(()) => {
                MAILBOXES_CREATED.inc();
                tracing::info!(mailbox_id = %row.mailbox_id, address = %row.address, "mailbox created");
                return Ok((
                    StatusCode::CREATED,
                    Json(MailboxEnvelope {
                        mailbox: mailbox_row_to_response(row)?,
                    }),
                ));
            }
            Err(MetadataError::AlreadyExists(_)) => {
                tracing::debug!(address = %address, "generated address collided, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ApiError::Internal(format!(
        "could not allocate a free address after {ADDRESS_GENERATION_ATTEMPTS} attempts"
    )))
}

/// GET /api/mailboxes - List active mailboxes, newest first.
pub async fn list_mailboxes(
    State(state): State<AppState>,
) -> ApiResult<Json<ListMailboxesResponse>> {
    let mailboxes = state
        .metadata
        .list_mailboxes()
        .await?
        .into_iter()
        .map(mailbox_row_to_response)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(ListMailboxesResponse { mailboxes }))
}

/// GET /api/mailboxes/{mailbox_id} - Fetch a single mailbox.
pub async fn get_mailbox(
    State(state): State<AppState>,
    Path(mailbox_id): Path<String>,
) -> ApiResult<Json<MailboxEnvelope>> {
    let mailbox_id = parse_id(&mailbox_id, "mailbox")?;

    let mailbox = state
        .metadata
        .get_mailbox(mailbox_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("mailbox not found".to_string()))?;

    Ok(Json(MailboxEnvelope {
        mailbox: mailbox_row_to_response(mailbox)?,
    }))
}

/// DELETE /api/mailboxes/{mailbox_id} - Delete a mailbox and its emails.
pub async fn delete_mailbox(
    State(state): State<AppState>,
    Path(mailbox_id): Path<String>,
) -> ApiResult<Json<DeleteMailboxResponse>> {
    let mailbox_id = parse_id(&mailbox_id, "mailbox")?;

    state.metadata.delete_mailbox(mailbox_id).await?;
    tracing::info!(mailbox_id = %mailbox_id, "mailbox deleted");

    Ok(Json(DeleteMailboxResponse { success: true }))
}
