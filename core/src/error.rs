//! Error types for SMELTER

use thiserror::Error;

/// Main error type for SMELTER
///
/// Every failure surfaces to the caller as a rejection of the current
/// transaction attempt with one of these classified reasons; nothing is
/// retried inside the processor.
#[derive(Error, Debug)]
pub enum SmelterError {
    // ============ Payload Errors ============
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unrecognized action: {0}")]
    UnrecognizedAction(String),

    // ============ Transition Errors ============
    #[error("Entity already exists: {0}")]
    DuplicateEntity(String),

    #[error("Unhandled action: {0}")]
    UnhandledAction(String),

    // ============ State Errors ============
    #[error("Invalid state address: {0}")]
    InvalidAddress(String),

    #[error("State unavailable: {0}")]
    StateUnavailable(String),

    // ============ General Errors ============
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SmelterError {
    /// Whether the error condemns the transaction itself.
    ///
    /// Validation errors are permanent: the same payload fails the same way
    /// on every node, so the caller can reject the transaction outright.
    /// Everything else is an availability or corruption failure where the
    /// caller may choose to resubmit the attempt.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SmelterError::MalformedPayload(_)
                | SmelterError::MissingField(_)
                | SmelterError::UnrecognizedAction(_)
                | SmelterError::DuplicateEntity(_)
                | SmelterError::UnhandledAction(_)
                | SmelterError::InvalidAddress(_)
        )
    }
}

impl From<std::io::Error> for SmelterError {
    fn from(err: std::io::Error) -> Self {
        SmelterError::StateUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(SmelterError::MalformedPayload("x".into()).is_validation());
        assert!(SmelterError::MissingField("name".into()).is_validation());
        assert!(SmelterError::UnrecognizedAction("frobnicate".into()).is_validation());
        assert!(SmelterError::DuplicateEntity("widget".into()).is_validation());
        assert!(SmelterError::UnhandledAction("transfer".into()).is_validation());

        assert!(!SmelterError::StateUnavailable("timeout".into()).is_validation());
        assert!(!SmelterError::Internal("corrupt record".into()).is_validation());
    }

    #[test]
    fn test_io_error_maps_to_state_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: SmelterError = io.into();
        assert!(matches!(err, SmelterError::StateUnavailable(_)));
    }

    #[test]
    fn test_display_carries_detail() {
        let err = SmelterError::DuplicateEntity("widget".into());
        assert_eq!(err.to_string(), "Entity already exists: widget");
    }
}
