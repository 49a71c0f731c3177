use std::fmt;

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A lock guarding the backend was poisoned.
    LockPoisoned(&'static str),
    /// Reading or writing the underlying medium failed.
    Io(String),
    /// The backend's own encoding could not be read or written.
    Serde(String),
    /// Any other backend-specific failure (quota, permission, ...).
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Io(msg) => write!(f, "storage io error: {}", msg),
            StorageError::Serde(msg) => write!(f, "storage serialization error: {}", msg),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}
