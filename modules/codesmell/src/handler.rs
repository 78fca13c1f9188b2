//! Transaction handler for the code-smell family

use async_trait::async_trait;
use smelter_core::{
    ProcessorConfig, SmelterError, SmelterResult, StateBackend, TransactionHandler,
    TransactionHeader,
};
use tracing::{debug, info};

use crate::addressing::namespace_prefix;
use crate::payload::{Action, CodeSmellPayload};
use crate::state::{CodeSmell, CodeSmellState};

/// Well-known name of the transaction family
pub const FAMILY_NAME: &str = "code-smell";

/// Family versions this handler accepts
pub const FAMILY_VERSIONS: &[&str] = &["0.1"];

/// Payload content encoding accepted by the decoder
pub const PAYLOAD_ENCODING: &str = "csv-utf8";

/// Transaction handler for the code-smell registry.
///
/// One instance serves the whole process; the namespace prefix is derived
/// once here and every apply call gets its own accessor and cache.
pub struct CodeSmellTransactionHandler {
    family_versions: Vec<String>,
    namespaces: Vec<String>,
    config: ProcessorConfig,
}

impl CodeSmellTransactionHandler {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            family_versions: FAMILY_VERSIONS.iter().map(|v| v.to_string()).collect(),
            namespaces: vec![namespace_prefix(FAMILY_NAME)],
            config,
        }
    }

    /// The namespace prefix this family stores state under
    pub fn namespace(&self) -> &str {
        &self.namespaces[0]
    }
}

impl Default for CodeSmellTransactionHandler {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

#[async_trait]
impl TransactionHandler for CodeSmellTransactionHandler {
    fn family_name(&self) -> &str {
        FAMILY_NAME
    }

    fn family_versions(&self) -> &[String] {
        &self.family_versions
    }

    fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    fn payload_encoding(&self) -> &str {
        PAYLOAD_ENCODING
    }

    async fn apply(
        &self,
        header: &TransactionHeader,
        payload: &[u8],
        backend: &dyn StateBackend,
    ) -> SmelterResult<()> {
        let request = CodeSmellPayload::from_bytes(payload)?;
        debug!(
            family_version = %header.family_version,
            action = %request.action(),
            "decoded transaction payload"
        );

        let mut state = CodeSmellState::new(backend, self.namespace(), self.config.state_timeout());

        match request.action() {
            Action::Create => {
                if state.get_code_smell(request.name()).await?.is_some() {
                    return Err(SmelterError::DuplicateEntity(request.name().to_string()));
                }

                let smell = CodeSmell::new(
                    request.name(),
                    request.value(),
                    Action::Create,
                    header.signer_public_key.as_str(),
                );
                state.set_code_smell(smell).await?;

                info!(
                    action = %Action::Create,
                    name = %request.name(),
                    signer = short_id(&header.signer_public_key),
                    "registered code-smell configuration"
                );
                Ok(())
            }
            other => Err(SmelterError::UnhandledAction(other.to_string())),
        }
    }
}

/// Leading characters of a signer key: enough to correlate log lines
/// without printing the full identity at default log level
fn short_id(signer: &str) -> &str {
    signer.get(..8).unwrap_or(signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CodeSmellState;
    use smelter_core::{StateAddress, StateEntry};
    use smelter_state::MemoryStateBackend;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SIGNER: &str = "abc1234567890def";

    fn header() -> TransactionHeader {
        TransactionHeader::new(SIGNER, FAMILY_NAME, "0.1")
    }

    #[test]
    fn test_family_metadata() {
        let handler = CodeSmellTransactionHandler::default();
        assert_eq!(handler.family_name(), "code-smell");
        assert_eq!(handler.family_versions(), ["0.1".to_string()]);
        assert_eq!(handler.payload_encoding(), "csv-utf8");
        assert_eq!(handler.namespaces().len(), 1);
        assert_eq!(handler.namespace().len(), StateAddress::PREFIX_LEN);
    }

    #[tokio::test]
    async fn test_create_end_to_end() {
        let handler = CodeSmellTransactionHandler::default();
        let backend = MemoryStateBackend::new();

        handler
            .apply(&header(), b"widget,42,create", &backend)
            .await
            .unwrap();

        let mut state =
            CodeSmellState::new(&backend, handler.namespace(), Duration::from_secs(3));
        let stored = state.get_code_smell("widget").await.unwrap().unwrap();
        assert_eq!(stored.name(), "widget");
        assert_eq!(stored.value(), "42");
        assert_eq!(stored.action(), Action::Create);
        assert_eq!(stored.owner(), SIGNER);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let handler = CodeSmellTransactionHandler::default();
        let backend = MemoryStateBackend::new();

        handler
            .apply(&header(), b"widget,42,create", &backend)
            .await
            .unwrap();
        let err = handler
            .apply(&header(), b"widget,43,create", &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, SmelterError::DuplicateEntity(name) if name == "widget"));

        // The losing attempt left no trace: the first record is intact
        let mut state =
            CodeSmellState::new(&backend, handler.namespace(), Duration::from_secs(3));
        let stored = state.get_code_smell("widget").await.unwrap().unwrap();
        assert_eq!(stored.value(), "42");
    }

    #[tokio::test]
    async fn test_recognized_but_unhandled_action() {
        let handler = CodeSmellTransactionHandler::default();
        let backend = MemoryStateBackend::new();

        let err = handler
            .apply(&header(), b"widget,42,transfer", &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, SmelterError::UnhandledAction(action) if action == "transfer"));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_decode_failures_surface_unchanged() {
        let handler = CodeSmellTransactionHandler::default();
        let backend = MemoryStateBackend::new();

        let err = handler.apply(&header(), b"onlyname", &backend).await.unwrap_err();
        assert!(matches!(err, SmelterError::MalformedPayload(_)));

        let err = handler
            .apply(&header(), b"name,value,frobnicate", &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, SmelterError::UnrecognizedAction(_)));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_unresponsive_backend_is_state_unavailable() {
        /// Read hangs past any deadline; writes are counted so the test can
        /// assert nothing was committed
        struct HangingBackend {
            writes: AtomicUsize,
        }

        #[async_trait]
        impl StateBackend for HangingBackend {
            async fn read(
                &self,
                _addresses: &[StateAddress],
                _timeout: Duration,
            ) -> SmelterResult<Vec<StateEntry>> {
                std::future::pending::<()>().await;
                unreachable!()
            }

            async fn write(
                &self,
                _entries: BTreeMap<StateAddress, Vec<u8>>,
                _timeout: Duration,
            ) -> SmelterResult<()> {
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let handler = CodeSmellTransactionHandler::new(ProcessorConfig {
            state_timeout_secs: 0,
        });
        let backend = HangingBackend {
            writes: AtomicUsize::new(0),
        };

        let err = handler
            .apply(&header(), b"widget,42,create", &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, SmelterError::StateUnavailable(_)));
        assert_eq!(backend.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_short_id_handles_short_keys() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(SIGNER), "abc12345");
    }
}
