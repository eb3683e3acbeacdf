//! Error conversion utilities

use super::types::{CacheError, RecoveryHint};
use std::path::PathBuf;

impl From<std::io::Error> for CacheError {
    fn from(error: std::io::Error) -> Self {
        CacheError::io(PathBuf::from("."), "unknown", error)
    }
}

/// Convert workspace errors raised by the shared utilities
impl From<textcache_core::Error> for CacheError {
    fn from(error: textcache_core::Error) -> Self {
        match error {
            textcache_core::Error::FileSystem {
                path,
                operation: _,
                source,
            } => CacheError::io(path, "file system operation", source),
            other => CacheError::Configuration {
                message: other.to_string(),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Check the textcache configuration".to_string(),
                },
            },
        }
    }
}

/// Convert serde_json errors raised while loading configuration files
impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        CacheError::Configuration {
            message: format!("invalid configuration file: {error}"),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check JSON format and field types".to_string(),
            },
        }
    }
}

/// Convert cache errors to core errors
impl From<CacheError> for textcache_core::Error {
    fn from(error: CacheError) -> Self {
        textcache_core::Error::Configuration {
            message: error.to_string(),
        }
    }
}
