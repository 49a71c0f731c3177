use std::fmt;

use crate::storage::StorageError;
use crate::transformer::TransformError;
use crate::value::Value;

/// Error type for [`crate::Persister`] operations and update events.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Nothing is stored under the key. Only surfaced by
    /// [`crate::Persister::retrieve_stored`]; `retrieve` uses the default.
    ValueAbsent { key: String },
    /// The stored value's shape does not match the transformer chain.
    UnexpectedValueType {
        actual: Value,
        expected: &'static str,
    },
    /// A transformer stage failed to encode or decode.
    TransformerFailed {
        stage: &'static str,
        input: String,
        cause: String,
    },
    /// The backend failed.
    StorageFailed(StorageError),
}

impl PersistenceError {
    /// Whether the default-value policy may substitute the default for this
    /// error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PersistenceError::UnexpectedValueType { .. } | PersistenceError::TransformerFailed { .. }
        )
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::ValueAbsent { key } => write!(f, "no value stored for key {}", key),
            PersistenceError::UnexpectedValueType { actual, expected } => write!(
                f,
                "unexpected value type: stored {} ({:?}) cannot be read as {}",
                actual.kind(),
                actual,
                expected
            ),
            PersistenceError::TransformerFailed {
                stage,
                input,
                cause,
            } => write!(f, "transformer {} failed on {}: {}", stage, input, cause),
            PersistenceError::StorageFailed(err) => write!(f, "storage failed: {}", err),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::StorageFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransformError> for PersistenceError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::UnexpectedValueType { actual, expected } => {
                PersistenceError::UnexpectedValueType { actual, expected }
            }
            TransformError::Failed {
                stage,
                input,
                cause,
            } => PersistenceError::TransformerFailed {
                stage,
                input,
                cause,
            },
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        PersistenceError::StorageFailed(err)
    }
}
