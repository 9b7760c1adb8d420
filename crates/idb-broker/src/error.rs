//! Broker error types.
//!
//! Attribute enrichment is best-effort: every error raised during resolution
//! is caught at the phase entry points, logged, and surfaced as a
//! [`Resolution::Failed`](crate::mapper::Resolution) outcome so the
//! federation attempt itself never fails.

use thiserror::Error;

/// Errors that can occur during attribute resolution.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Mapper or remote-source configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport error while reaching the remote source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A timeout budget was exceeded.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The remote payload could not be parsed or had an unusable shape.
    #[error("Payload error: {0}")]
    Payload(String),

    /// Error from the user store.
    #[error("Storage error: {0}")]
    Storage(#[from] idb_storage::StorageError),

    /// Internal error.
    #[error("Internal broker error: {0}")]
    Internal(String),
}

impl BrokerError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a payload error.
    #[must_use]
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Checks if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Checks if this is a transport-level error (including timeouts).
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Payload(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(BrokerError::config("attribute name missing").is_configuration());
        assert!(BrokerError::transport("connection refused").is_transport_error());
        assert!(BrokerError::timeout("budget exceeded").is_transport_error());
        assert!(!BrokerError::payload("not json").is_transport_error());
    }

    #[test]
    fn storage_errors_convert() {
        let storage = idb_storage::StorageError::Connection("down".to_string());
        let err: BrokerError = storage.into();
        assert!(matches!(err, BrokerError::Storage(_)));
    }
}
