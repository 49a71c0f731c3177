use std::error::Error;
use std::fmt;

use crate::value::Value;

/// Error raised by a transformer stage.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A stored [`Value`] does not have the shape the stage expects.
    UnexpectedValueType {
        actual: Value,
        expected: &'static str,
    },
    /// A stage could not encode or decode its input.
    Failed {
        stage: &'static str,
        input: String,
        cause: String,
    },
}

impl TransformError {
    pub fn unexpected_value_type(actual: Value, expected: &'static str) -> Self {
        TransformError::UnexpectedValueType { actual, expected }
    }

    pub fn failed(stage: &'static str, input: impl Into<String>, cause: impl fmt::Display) -> Self {
        TransformError::Failed {
            stage,
            input: input.into(),
            cause: cause.to_string(),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::UnexpectedValueType { actual, expected } => write!(
                f,
                "unexpected value type: stored {} cannot be read as {}",
                actual.kind(),
                expected
            ),
            TransformError::Failed {
                stage,
                input,
                cause,
            } => write!(f, "{} transform failed on {}: {}", stage, input, cause),
        }
    }
}

impl Error for TransformError {}

const PREVIEW_LEN: usize = 64;

/// Short printable preview of a byte payload for error messages.
pub(crate) fn describe_bytes(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.chars().count() <= PREVIEW_LEN {
        format!("{:?}", text)
    } else {
        let head: String = text.chars().take(PREVIEW_LEN).collect();
        format!("{:?}... ({} bytes)", head, bytes.len())
    }
}
