//! Payload decoding for the code-smell family
//!
//! The wire format is a UTF-8, comma-separated record:
//! `name,value,action` with an optional trailing `owner` hint. The
//! authoritative owner of a created entity is always the transaction
//! signer, never the payload.

use serde::{Deserialize, Serialize};
use smelter_core::{SmelterError, SmelterResult};
use std::fmt;
use std::str::FromStr;

use crate::state::RECORD_DELIMITER;

/// Field separator within a payload or a stored record
pub const FIELD_DELIMITER: char = ',';

/// Actions understood by the code-smell family.
///
/// Only `create` has a transition rule today; the rest are recognized on
/// the wire and rejected by the handler as unhandled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Transfer,
    Accept,
    Reject,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Transfer => "transfer",
            Action::Accept => "accept",
            Action::Reject => "reject",
        }
    }

    /// Whether the action requires a non-empty `value` field
    pub fn requires_value(&self) -> bool {
        matches!(self, Action::Create)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = SmelterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "transfer" => Ok(Action::Transfer),
            "accept" => Ok(Action::Accept),
            "reject" => Ok(Action::Reject),
            other => Err(SmelterError::UnrecognizedAction(other.to_string())),
        }
    }
}

/// Decoded, validated transaction request.
///
/// Immutable once decoded; every field is reached through its own accessor
/// and nothing is silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSmellPayload {
    name: String,
    value: String,
    action: Action,
    owner: Option<String>,
}

impl CodeSmellPayload {
    /// Decode a raw payload into a validated request.
    pub fn from_bytes(raw: &[u8]) -> SmelterResult<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| SmelterError::MalformedPayload("payload is not valid UTF-8".into()))?;

        let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();
        let (name, value, action, owner) = match fields.as_slice() {
            [name, value, action] => (*name, *value, *action, None),
            [name, value, action, owner] => (*name, *value, *action, Some(*owner)),
            _ => {
                return Err(SmelterError::MalformedPayload(format!(
                    "expected 3 or 4 fields, got {}",
                    fields.len()
                )))
            }
        };

        if name.is_empty() {
            return Err(SmelterError::MissingField("name".into()));
        }
        if action.is_empty() {
            return Err(SmelterError::MissingField("action".into()));
        }
        let action = Action::from_str(action)?;
        if action.requires_value() && value.is_empty() {
            return Err(SmelterError::MissingField("value".into()));
        }
        // A field carrying the record delimiter would corrupt the stored
        // collection encoding on the next deserialization.
        if fields.iter().any(|field| field.contains(RECORD_DELIMITER)) {
            return Err(SmelterError::MalformedPayload(format!(
                "fields may not contain '{}'",
                RECORD_DELIMITER
            )));
        }

        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            action,
            owner: owner.map(str::to_string),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Owner hint from the wire, if the client sent the four-field form
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}
