//! State access for the code-smell family
//!
//! Entities live behind hash-derived addresses as a keyed collection: one
//! address bucket stores every record whose name hashes there, serialized
//! as `name,value,action,owner` records joined by `|` and sorted by name.

use smelter_core::{SmelterError, SmelterResult, StateAddress, StateBackend};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::addressing::make_address;
use crate::payload::{Action, FIELD_DELIMITER};

/// Record separator between serialized entities within one address bucket
pub const RECORD_DELIMITER: char = '|';

/// A registered code-smell configuration.
///
/// `owner` is the signer that created the record and never changes;
/// `action` is the action that produced the current state, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSmell {
    name: String,
    value: String,
    action: Action,
    owner: String,
}

impl CodeSmell {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        action: Action,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            action,
            owner: owner.into(),
        }
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

    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn to_record(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.name,
            self.value,
            self.action,
            self.owner,
            sep = FIELD_DELIMITER
        )
    }

    fn from_record(record: &str) -> SmelterResult<Self> {
        let fields: Vec<&str> = record.split(FIELD_DELIMITER).collect();
        match fields.as_slice() {
            [name, value, action, owner] => {
                let action = Action::from_str(action)
                    .map_err(|_| corrupt(format!("unknown stored action: {}", action)))?;
                Ok(CodeSmell::new(*name, *value, action, *owner))
            }
            _ => Err(corrupt(format!(
                "stored record has {} fields, expected 4",
                fields.len()
            ))),
        }
    }
}

fn corrupt(detail: String) -> SmelterError {
    SmelterError::Internal(format!("failed to deserialize code-smell data: {}", detail))
}

/// Every entity stored at one address bucket, keyed by name.
///
/// Backed by a `BTreeMap` so serialization iterates in name order and an
/// unchanged collection always re-serializes to identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSmellCollection {
    entries: BTreeMap<String, CodeSmell>,
}

impl CodeSmellCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&CodeSmell> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, smell: CodeSmell) {
        self.entries.insert(smell.name().to_string(), smell);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the whole collection, sorted by name
    pub fn to_bytes(&self) -> Vec<u8> {
        let records: Vec<String> = self.entries.values().map(CodeSmell::to_record).collect();
        records.join(&RECORD_DELIMITER.to_string()).into_bytes()
    }

    /// Deserialize stored bytes; corruption surfaces as an internal error
    pub fn from_bytes(data: &[u8]) -> SmelterResult<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }
        let text = std::str::from_utf8(data)
            .map_err(|_| corrupt("stored bytes are not valid UTF-8".into()))?;

        let mut entries = BTreeMap::new();
        for record in text.split(RECORD_DELIMITER) {
            let smell = CodeSmell::from_record(record)?;
            entries.insert(smell.name().to_string(), smell);
        }
        Ok(Self { entries })
    }
}

/// Request-scoped accessor over the family's slice of the state store.
///
/// Holds the per-transaction address cache, so each address is read from
/// the backend at most once per apply call; the accessor is dropped with
/// the call and never shared.
pub struct CodeSmellState<'a> {
    backend: &'a dyn StateBackend,
    namespace: &'a str,
    timeout: Duration,
    cache: HashMap<StateAddress, Option<Vec<u8>>>,
}

impl<'a> CodeSmellState<'a> {
    pub fn new(backend: &'a dyn StateBackend, namespace: &'a str, timeout: Duration) -> Self {
        Self {
            backend,
            namespace,
            timeout,
            cache: HashMap::new(),
        }
    }

    /// Fetch a registered code smell by name
    pub async fn get_code_smell(&mut self, name: &str) -> SmelterResult<Option<CodeSmell>> {
        let address = make_address(self.namespace, name);
        let collection = self.load_collection(&address).await?;
        Ok(collection.get(name).cloned())
    }

    /// Store a code smell under its name.
    ///
    /// Read-modify-write on the whole bucket: load the collection, insert
    /// the record, write the re-serialized collection back in one call.
    pub async fn set_code_smell(&mut self, smell: CodeSmell) -> SmelterResult<()> {
        let address = make_address(self.namespace, smell.name());
        let mut collection = self.load_collection(&address).await?;
        collection.insert(smell);

        let data = collection.to_bytes();
        self.cache.insert(address.clone(), Some(data.clone()));

        let mut entries = BTreeMap::new();
        entries.insert(address, data);
        match tokio::time::timeout(self.timeout, self.backend.write(entries, self.timeout)).await {
            Ok(result) => result,
            Err(_) => Err(SmelterError::StateUnavailable(format!(
                "state write timed out after {:?}",
                self.timeout
            ))),
        }
    }

    /// Load the collection at an address, consulting the cache first
    async fn load_collection(&mut self, address: &StateAddress) -> SmelterResult<CodeSmellCollection> {
        if let Some(cached) = self.cache.get(address) {
            return match cached {
                Some(data) => CodeSmellCollection::from_bytes(data),
                None => Ok(CodeSmellCollection::default()),
            };
        }

        let addresses = [address.clone()];
        let read = self.backend.read(&addresses, self.timeout);
        let entries = match tokio::time::timeout(self.timeout, read).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SmelterError::StateUnavailable(format!(
                    "state read timed out after {:?}",
                    self.timeout
                )))
            }
        };

        match entries.into_iter().find(|entry| entry.address == *address) {
            Some(entry) => {
                debug!(address = %entry.address, bytes = entry.data.len(), "state read");
                let collection = CodeSmellCollection::from_bytes(&entry.data)?;
                self.cache.insert(address.clone(), Some(entry.data));
                Ok(collection)
            }
            None => {
                self.cache.insert(address.clone(), None);
                Ok(CodeSmellCollection::default())
            }
        }
    }
}
