//! Core types for SMELTER
//!
//! Defines the fundamental data structures shared between the state
//! backends and the transaction family modules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SmelterError;

/// 70-character hexadecimal state address: a 6-character family namespace
/// prefix followed by a 64-character per-entity hash suffix.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateAddress(String);

impl StateAddress {
    /// Total address length in hex characters
    pub const LEN: usize = 70;

    /// Namespace prefix length in hex characters
    pub const PREFIX_LEN: usize = 6;

    /// Build an address from an already-derived hex string.
    ///
    /// Address derivation is the only producer of these strings inside the
    /// processor; validity is checked in debug builds only. Untrusted input
    /// goes through [`StateAddress::from_hex`] instead.
    pub fn new(hex: String) -> Self {
        debug_assert!(is_valid_address(&hex), "derived address must be {} lowercase hex chars", Self::LEN);
        StateAddress(hex)
    }

    /// Parse and validate an address from untrusted input.
    pub fn from_hex(s: impl Into<String>) -> Result<Self, SmelterError> {
        let s = s.into();
        if !is_valid_address(&s) {
            return Err(SmelterError::InvalidAddress(s));
        }
        Ok(StateAddress(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 6-character family namespace this address belongs to
    pub fn prefix(&self) -> &str {
        &self.0[..Self::PREFIX_LEN]
    }
}

fn is_valid_address(s: &str) -> bool {
    s.len() == StateAddress::LEN
        && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

impl fmt::Display for StateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for StateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateAddress({}..{})", &self.0[..Self::PREFIX_LEN], &self.0[self.0.len() - 6..])
    }
}

/// A single entry read from the state store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// Address the entry is stored at
    pub address: StateAddress,
    /// Opaque serialized value
    pub data: Vec<u8>,
}

impl StateEntry {
    pub fn new(address: StateAddress, data: Vec<u8>) -> Self {
        Self { address, data }
    }
}

/// Transaction header fields supplied by the surrounding runtime.
///
/// The runtime owns header parsing and signature verification; the processor
/// only consumes the already-verified signer identity and routing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Hex-encoded public key of the transaction signer
    pub signer_public_key: String,
    /// Family name the transaction was routed by
    pub family_name: String,
    /// Family version the client targeted
    pub family_version: String,
}

impl TransactionHeader {
    pub fn new(
        signer_public_key: impl Into<String>,
        family_name: impl Into<String>,
        family_version: impl Into<String>,
    ) -> Self {
        Self {
            signer_public_key: signer_public_key.into(),
            family_name: family_name.into(),
            family_version: family_version.into(),
        }
    }
}
