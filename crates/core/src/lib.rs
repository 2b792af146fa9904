//! Core domain types and shared logic for the driftmail disposable inbox
//! service.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Mailbox addresses and the random address generator
//! - Normalized inbound/outbound message forms
//! - Configuration types

pub mod address;
pub mod config;
pub mod error;
pub mod message;

pub use address::{LOCAL_PART_LEN, MailboxAddress};
pub use config::{AppConfig, MailConfig, MetadataConfig, ServerConfig};
pub use error::{Error, Result};
pub use message::{InboundMessage, OutboundMessage};

/// Bounded number of attempts when generating a fresh mailbox address.
pub const ADDRESS_GENERATION_ATTEMPTS: u32 = 5;
