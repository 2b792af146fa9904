//! HTTP request handlers.

pub mod common;
pub mod emails;
pub mod health;
pub mod ingest;
pub mod mailboxes;

pub use emails::*;
pub use health::*;
pub use ingest::*;
pub use mailboxes::*;
