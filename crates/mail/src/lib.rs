//! Third-party mail edges for driftmail.
//!
//! Two concerns live here, both delegated to the ecosystem:
//! - Parsing raw RFC 822 payloads from the mail-routing trigger (`mail-parser`)
//! - Delivering outbound mail through a Resend-compatible API (`reqwest`)

pub mod error;
pub mod inbound;
pub mod outbound;

pub use error::{MailError, MailResult};
pub use inbound::parse_inbound;
pub use outbound::{DeliveryReceipt, Sender};
