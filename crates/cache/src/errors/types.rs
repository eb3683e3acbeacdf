//! Core error types for the text cache

use std::path::PathBuf;
use std::time::Duration;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Re-export CacheError as Error for convenience
pub use CacheError as Error;

/// Error type for attribute and storage operations
///
/// A missing blob is never an error: reads return `Ok(None)` and existence
/// checks return `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O errors while touching durable storage
    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Stored bytes do not have the expected framing
    #[error("stored data corrupted for '{key}': {reason}")]
    Corruption {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Deflate or inflate failed
    #[error("failed to {operation} stored data: {source}")]
    Compression {
        operation: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
        recovery_hint: RecoveryHint,
    },

    /// Stored bytes cannot be decoded as text under their encoding tag
    #[error("cannot decode '{key}' as {encoding}: {reason}")]
    Encoding {
        key: String,
        encoding: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// A storage path was requested for an entity without an id
    #[error("cannot {operation} for {type_name}: entity has no id yet")]
    MissingIdentity {
        type_name: String,
        operation: &'static str,
        recovery_hint: RecoveryHint,
    },

    /// The identity cannot be turned into a storage path
    #[error("invalid entity identity '{identity}': {reason}")]
    InvalidIdentity {
        identity: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryHint {
    /// Retry the operation
    Retry { after: Duration },

    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// Remove the stored value and write it again
    ClearAndRetry,

    /// Persist the entity so it gets an id, then retry
    AssignIdentity,

    /// Use a default value
    UseDefault { value: String },

    /// No automated recovery possible
    Manual { instructions: String },

    /// No recovery possible
    NoRecovery,
}

impl CacheError {
    /// Build an I/O error, deriving the recovery hint from the error kind
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let path = path.into();
        let recovery_hint = match source.kind() {
            ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions { path: path.clone() },
            ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut => {
                RecoveryHint::Retry {
                    after: Duration::from_millis(100),
                }
            }
            _ => RecoveryHint::Manual {
                instructions: format!("Check that '{}' is writable", path.display()),
            },
        };

        Self::Io {
            path,
            operation,
            source,
            recovery_hint,
        }
    }

    /// Build a corruption error for the given storage key
    #[must_use]
    pub fn corruption(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corruption {
            key: key.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::ClearAndRetry,
        }
    }

    /// Build a precondition error for an entity without an id
    #[must_use]
    pub fn missing_identity(type_name: impl Into<String>, operation: &'static str) -> Self {
        Self::MissingIdentity {
            type_name: type_name.into(),
            operation,
            recovery_hint: RecoveryHint::AssignIdentity,
        }
    }

    /// Build a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check the textcache configuration".to_string(),
            },
        }
    }
}
