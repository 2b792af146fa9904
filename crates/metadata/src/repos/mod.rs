//! Repository traits for metadata operations.

pub mod emails;
pub mod mailboxes;

pub use emails::{EmailPage, EmailRepo};
pub use mailboxes::MailboxRepo;
