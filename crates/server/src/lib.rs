//! HTTP API server for driftmail.
//!
//! This crate provides the HTTP control plane:
//! - Mailbox lifecycle (create with collision-checked addresses, list, delete)
//! - Paginated inbox reads and read-marking
//! - Send via a transactional API
//! - Inbound ingestion from the webhook and raw mail-routing triggers
//! - Static frontend serving

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
