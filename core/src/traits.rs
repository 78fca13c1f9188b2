//! Core traits defining SMELTER interfaces
//!
//! These traits define the two boundaries of the processor: the state
//! backend it consumes and the handler surface it exposes to the runtime.

use crate::types::{StateAddress, StateEntry, TransactionHeader};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// Result type for SMELTER operations
pub type SmelterResult<T> = Result<T, crate::error::SmelterError>;

/// State backend interface consumed by the processor.
///
/// The backend is owned by the surrounding runtime and shared across
/// transactions; it is expected to provide per-address serializability.
/// The processor only ever borrows it for the duration of one apply call.
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Read the entries stored at the given addresses.
    ///
    /// Returns only entries that exist; an address with no value is simply
    /// absent from the result. The call must complete within `timeout`.
    async fn read(
        &self,
        addresses: &[StateAddress],
        timeout: Duration,
    ) -> SmelterResult<Vec<StateEntry>>;

    /// Write the given address → value map, all-or-nothing.
    ///
    /// The call must complete within `timeout`.
    async fn write(
        &self,
        entries: BTreeMap<StateAddress, Vec<u8>>,
        timeout: Duration,
    ) -> SmelterResult<()>;
}

/// Transaction handler surface exposed to the surrounding runtime.
///
/// The runtime routes transactions by the static family metadata and calls
/// [`TransactionHandler::apply`] with a verified header and a fresh backend
/// reference per transaction.
#[async_trait]
pub trait TransactionHandler: Send + Sync {
    /// Well-known family name the handler serves
    fn family_name(&self) -> &str;

    /// Family versions the handler accepts
    fn family_versions(&self) -> &[String];

    /// Namespace prefixes the handler owns state under
    fn namespaces(&self) -> &[String];

    /// Payload content encoding accepted by the decoder
    fn payload_encoding(&self) -> &str;

    /// Apply one transaction to completion.
    ///
    /// Runs the decode → derive → read → mutate pipeline and either commits
    /// exactly one state write or rejects the transaction with a classified
    /// error, leaving state untouched.
    async fn apply(
        &self,
        header: &TransactionHeader,
        payload: &[u8],
        backend: &dyn StateBackend,
    ) -> SmelterResult<()>;
}
