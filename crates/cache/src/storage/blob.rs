//! Values exchanged with storage backends

use crate::errors::{CacheError, RecoveryHint, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use textcache_core::DEFAULT_ENCODING;

/// Name of the character encoding a blob's bytes are in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoding(String);

impl Encoding {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn utf8() -> Self {
        Self(DEFAULT_ENCODING.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether bytes under this tag can be read as Rust strings.
    /// ASCII is a subset of UTF-8, so it qualifies too.
    #[must_use]
    pub fn is_utf8_compatible(&self) -> bool {
        matches!(
            self.0.to_ascii_uppercase().as_str(),
            "UTF-8" | "UTF8" | "US-ASCII" | "ASCII"
        )
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw bytes plus the encoding tag they were written with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    data: Vec<u8>,
    encoding: Encoding,
}

impl Blob {
    /// Bytes tagged with the default encoding
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            encoding: Encoding::utf8(),
        }
    }

    pub fn with_encoding(data: impl Into<Vec<u8>>, encoding: Encoding) -> Self {
        Self {
            data: data.into(),
            encoding,
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes())
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Decode the bytes as text; `key` names the blob in errors
    pub fn into_text(self, key: &str) -> Result<String> {
        if !self.encoding.is_utf8_compatible() {
            return Err(CacheError::Encoding {
                key: key.to_string(),
                encoding: self.encoding.0,
                reason: "unsupported encoding".to_string(),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Re-write the value as UTF-8 text".to_string(),
                },
            });
        }

        String::from_utf8(self.data).map_err(|e| CacheError::Encoding {
            key: key.to_string(),
            encoding: self.encoding.0,
            reason: e.utf8_error().to_string(),
            recovery_hint: RecoveryHint::ClearAndRetry,
        })
    }
}
