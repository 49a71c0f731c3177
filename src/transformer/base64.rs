use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

use super::{TransformError, Transformer};

/// Bytes to base64 text, for backends that only hold strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Transformer {
    url_safe: bool,
}

impl Base64Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the URL-safe alphabet instead of the standard one.
    pub fn url_safe() -> Self {
        Self { url_safe: true }
    }
}

impl Transformer for Base64Transformer {
    type Input = Vec<u8>;
    type Output = String;

    fn forward(&self, input: &Vec<u8>) -> Result<String, TransformError> {
        Ok(if self.url_safe {
            URL_SAFE.encode(input)
        } else {
            STANDARD.encode(input)
        })
    }

    fn backward(&self, output: String) -> Result<Vec<u8>, TransformError> {
        let decoded = if self.url_safe {
            URL_SAFE.decode(output.as_bytes())
        } else {
            STANDARD.decode(output.as_bytes())
        };
        decoded.map_err(|e| TransformError::failed("base64", format!("{:?}", output), e))
    }

    fn stage(&self) -> &'static str {
        "base64"
    }
}
