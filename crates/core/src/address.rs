//! Mailbox address type and random generation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of generated local parts.
pub const LOCAL_PART_LEN: usize = 12;

/// Alphabet for generated local parts.
const LOCAL_PART_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A validated mailbox address (`local@domain`).
///
/// Addresses are normalized to ASCII lowercase so that lookups for inbound
/// recipients match regardless of sender casing.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MailboxAddress {
    local: String,
    domain: String,
}

impl MailboxAddress {
    /// Parse a full address string, validating format.
    pub fn parse(address: &str) -> crate::Result<Self> {
        let address = address.trim();
        let (local, domain) = address.rsplit_once('@').ok_or_else(|| {
            crate::Error::InvalidAddress(format!("missing '@' in '{address}'"))
        })?;

        if local.is_empty() {
            return Err(crate::Error::InvalidAddress(
                "local part cannot be empty".to_string(),
            ));
        }
        if domain.is_empty() {
            return Err(crate::Error::InvalidAddress(
                "domain cannot be empty".to_string(),
            ));
        }
        if !address.is_ascii() {
            return Err(crate::Error::InvalidAddress(format!(
                "non-ASCII characters in '{address}'"
            )));
        }
        if address.chars().any(char::is_whitespace) {
            return Err(crate::Error::InvalidAddress(format!(
                "whitespace in '{address}'"
            )));
        }

        Ok(Self {
            local: local.to_ascii_lowercase(),
            domain: domain.to_ascii_lowercase(),
        })
    }

    /// Generate a random address under the given domain.
    pub fn generate(domain: &str) -> crate::Result<Self> {
        let local = generate_local_part(&mut rand::thread_rng());
        Self::parse(&format!("{local}@{domain}"))
    }

    /// Get the local part.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Get the domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether this address belongs to the given domain.
    pub fn in_domain(&self, domain: &str) -> bool {
        self.domain.eq_ignore_ascii_case(domain)
    }
}

impl fmt::Debug for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MailboxAddress({self})")
    }
}

impl fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl TryFrom<String> for MailboxAddress {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::parse(&value)
    }
}

impl From<MailboxAddress> for String {
    fn from(address: MailboxAddress) -> Self {
        address.to_string()
    }
}

/// Generate a random local part from the `[a-z0-9]` alphabet.
pub fn generate_local_part(rng: &mut impl Rng) -> String {
    (0..LOCAL_PART_LEN)
        .map(|_| LOCAL_PART_CHARS[rng.gen_range(0..LOCAL_PART_CHARS.len())] as char)
        .collect()
}
