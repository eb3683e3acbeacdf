//! Transparent compression for any storage backend
//!
//! Stored payloads are `<encoding>|<zlib deflated bytes>`. The encoding tag is
//! restored on read so callers get back the text form they wrote.

use super::{Blob, Encoding, TextStorage};
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::paths::CachePath;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use textcache_core::{
    DEFAULT_COMPRESSION_LEVEL, DEFAULT_ENCODING, ENCODING_SEPARATOR, MAX_COMPRESSION_LEVEL,
};

/// Compression configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Whether stored blobs are deflated
    pub enabled: bool,
    /// Deflate level, 0 (store) to 9 (best)
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl CompressionConfig {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.level > MAX_COMPRESSION_LEVEL {
            return Err(CacheError::Configuration {
                message: format!(
                    "compression level {} is out of range 0-{MAX_COMPRESSION_LEVEL}",
                    self.level
                ),
                recovery_hint: RecoveryHint::UseDefault {
                    value: DEFAULT_COMPRESSION_LEVEL.to_string(),
                },
            });
        }
        Ok(())
    }
}

/// Frame a blob as `<encoding>|<deflated data>`
///
/// The tag must be non-empty and free of the separator byte.
pub fn encode_payload(blob: &Blob, level: u32) -> Result<Vec<u8>> {
    let deflate_error = |e: std::io::Error| CacheError::Compression {
        operation: "deflate",
        source: Box::new(e),
        recovery_hint: RecoveryHint::NoRecovery,
    };

    let tag = blob.encoding().as_str().as_bytes();
    if tag.is_empty() || tag.contains(&ENCODING_SEPARATOR) {
        return Err(CacheError::Configuration {
            message: format!(
                "encoding tag '{}' must be non-empty and must not contain '{}'",
                blob.encoding(),
                char::from(ENCODING_SEPARATOR)
            ),
            recovery_hint: RecoveryHint::UseDefault {
                value: DEFAULT_ENCODING.to_string(),
            },
        });
    }

    let mut output = Vec::with_capacity(tag.len() + 1 + blob.len() / 2);
    output.extend_from_slice(tag);
    output.push(ENCODING_SEPARATOR);

    let mut encoder = ZlibEncoder::new(output, Compression::new(level));
    encoder.write_all(blob.data()).map_err(deflate_error)?;
    encoder.finish().map_err(deflate_error)
}

/// Split the encoding tag off a stored payload and inflate the rest
///
/// A payload without a separator, with a non-text tag, or with a body that
/// does not inflate is corrupt; it is never reported as a missing value.
pub fn decode_payload(key: &str, payload: &[u8]) -> Result<Blob> {
    let separator = payload
        .iter()
        .position(|&b| b == ENCODING_SEPARATOR)
        .ok_or_else(|| CacheError::corruption(key, "missing encoding separator"))?;

    let (tag, rest) = payload.split_at(separator);
    let tag = std::str::from_utf8(tag)
        .map_err(|_| CacheError::corruption(key, "encoding tag is not valid text"))?;
    if tag.is_empty() {
        return Err(CacheError::corruption(key, "empty encoding tag"));
    }

    let mut data = Vec::new();
    ZlibDecoder::new(&rest[1..])
        .read_to_end(&mut data)
        .map_err(|e| CacheError::Compression {
            operation: "inflate",
            source: Box::new(e),
            recovery_hint: RecoveryHint::ClearAndRetry,
        })?;

    Ok(Blob::with_encoding(data, Encoding::new(tag)))
}

/// Decorator deflating writes and inflating reads of the wrapped backend
#[derive(Debug, Clone)]
pub struct CompressedStorage<S> {
    inner: S,
    level: u32,
}

impl<S: TextStorage> CompressedStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Wrap with an explicit deflate level, clamped to 0-9
    pub fn with_level(inner: S, level: u32) -> Self {
        Self {
            inner,
            level: level.min(MAX_COMPRESSION_LEVEL),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl<S: TextStorage> TextStorage for CompressedStorage<S> {
    fn write(&self, path: &CachePath, attribute: &str, blob: &Blob) -> Result<()> {
        let payload = encode_payload(blob, self.level)?;
        tracing::trace!(
            attribute,
            original = blob.len(),
            compressed = payload.len(),
            "deflated attribute"
        );
        self.inner.write(path, attribute, &Blob::new(payload))
    }

    fn read(&self, path: &CachePath, attribute: &str) -> Result<Option<Blob>> {
        let Some(stored) = self.inner.read(path, attribute)? else {
            return Ok(None);
        };

        let key = path.storage_key(attribute)?;
        decode_payload(&key, stored.data()).map(Some).map_err(|e| {
            tracing::warn!(%key, error = %e, "stored attribute is corrupt");
            e
        })
    }

    fn exists(&self, path: &CachePath, attribute: &str) -> Result<bool> {
        self.inner.exists(path, attribute)
    }

    fn remove(&self, path: &CachePath, attribute: &str) -> Result<()> {
        self.inner.remove(path, attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_payload_is_tagged_and_deflated() {
        let payload = encode_payload(&Blob::from_text("hi"), DEFAULT_COMPRESSION_LEVEL).unwrap();

        assert_ne!(payload, b"hi");
        assert!(payload.starts_with(b"UTF-8|"));

        let mut inflated = String::new();
        ZlibDecoder::new(&payload[b"UTF-8|".len()..])
            .read_to_string(&mut inflated)
            .unwrap();
        assert_eq!(inflated, "hi");
    }

    #[test]
    fn test_missing_separator_is_corruption() {
        let err = decode_payload("foo", b"no separator here").unwrap_err();
        assert!(err.is_corruption());
        assert!(matches!(err, CacheError::Corruption { .. }));
    }

    #[test]
    fn test_bad_stream_is_corruption() {
        let err = decode_payload("foo", b"UTF-8|definitely not zlib").unwrap_err();
        assert!(err.is_corruption());
        assert!(matches!(err, CacheError::Compression { operation: "inflate", .. }));
    }

    #[test]
    fn test_empty_tag_is_corruption() {
        let err = decode_payload("foo", b"|x").unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_tag_splits_at_first_separator() {
        // Deflated bytes may contain the separator; only the first one frames the tag
        let text = "a|b|c|".repeat(50);
        let payload = encode_payload(&Blob::from_text(&text), 9).unwrap();
        let blob = decode_payload("foo", &payload).unwrap();
        assert_eq!(blob.into_text("foo").unwrap(), text);
    }

    #[test]
    fn test_unframeable_tags_are_refused_on_write() {
        for tag in ["X|Y", ""] {
            let blob = Blob::with_encoding(b"plain".to_vec(), Encoding::new(tag));
            let err = encode_payload(&blob, DEFAULT_COMPRESSION_LEVEL).unwrap_err();
            assert!(matches!(err, CacheError::Configuration { .. }));
            assert!(!err.is_corruption());
        }
    }

    #[test]
    fn test_compressed_write_with_unframeable_tag_stores_nothing() {
        use crate::storage::{MemoryStorage, MemoryStore};
        use crate::paths::PathResolver;

        let memory = MemoryStore::new();
        let storage = CompressedStorage::new(MemoryStorage::new(memory.clone()));
        let path = PathResolver::default().resolve_parts("TestModel", 5).unwrap();
        let blob = Blob::with_encoding(b"plain".to_vec(), Encoding::new("X|Y"));

        assert!(storage.write(&path, "foo", &blob).is_err());
        assert!(memory.is_empty());
        assert_eq!(storage.read(&path, "foo").unwrap(), None);
    }

    #[test]
    fn test_config_validation() {
        assert!(CompressionConfig::default().validate().is_ok());
        let bad = CompressionConfig {
            enabled: true,
            level: 12,
        };
        let err = bad.validate().unwrap_err();
        assert!(matches!(
            err.recovery_hint(),
            RecoveryHint::UseDefault { .. }
        ));
    }

    proptest! {
        #[test]
        fn proptest_payload_preserves_text_and_tag(
            text in "\\PC{0,256}",
            tag in prop_oneof![Just("UTF-8"), Just("US-ASCII"), Just("ISO-8859-1")],
            level in 0u32..=9
        ) {
            let blob = Blob::with_encoding(text.as_bytes().to_vec(), Encoding::new(tag));
            let payload = encode_payload(&blob, level).unwrap();
            let decoded = decode_payload("prop", &payload).unwrap();
            prop_assert_eq!(decoded.encoding().as_str(), tag);
            prop_assert_eq!(decoded.data(), text.as_bytes());
        }
    }
}
