//! Recovery utilities for cache errors

use super::types::{CacheError, RecoveryHint};

impl CacheError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::Io { recovery_hint, .. }
            | Self::Corruption { recovery_hint, .. }
            | Self::Compression { recovery_hint, .. }
            | Self::Encoding { recovery_hint, .. }
            | Self::MissingIdentity { recovery_hint, .. }
            | Self::InvalidIdentity { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Check if this error is transient and can be retried
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::Retry { .. })
    }

    /// Check if this error indicates stored data that cannot be read back
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Corruption { .. }
                | Self::Encoding { .. }
                | Self::Compression {
                    operation: "inflate",
                    ..
                }
        )
    }

    /// Check if the caller invoked an operation the entity is not ready for
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentity { .. } | Self::InvalidIdentity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_corruption_classification() {
        let err = CacheError::corruption("text_cache/abc/foo", "missing encoding separator");
        assert!(err.is_corruption());
        assert!(!err.is_transient());
        assert_eq!(err.recovery_hint(), &RecoveryHint::ClearAndRetry);
    }

    #[test]
    fn test_inflate_failure_is_corruption_but_deflate_is_not() {
        let inflate = CacheError::Compression {
            operation: "inflate",
            source: Box::new(io::Error::new(io::ErrorKind::InvalidData, "bad stream")),
            recovery_hint: RecoveryHint::ClearAndRetry,
        };
        let deflate = CacheError::Compression {
            operation: "deflate",
            source: Box::new(io::Error::new(io::ErrorKind::Other, "oom")),
            recovery_hint: RecoveryHint::NoRecovery,
        };
        assert!(inflate.is_corruption());
        assert!(!deflate.is_corruption());
    }

    #[test]
    fn test_missing_identity_is_precondition() {
        let err = CacheError::missing_identity("Article", "resolve storage path");
        assert!(err.is_precondition());
        assert_eq!(err.recovery_hint(), &RecoveryHint::AssignIdentity);
        assert_eq!(
            err.to_string(),
            "cannot resolve storage path for Article: entity has no id yet"
        );
    }

    #[test]
    fn test_io_hint_follows_error_kind() {
        let denied = CacheError::io(
            "/srv/text_cache",
            "write attribute",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            denied.recovery_hint(),
            &RecoveryHint::CheckPermissions {
                path: PathBuf::from("/srv/text_cache")
            }
        );

        let timed_out = CacheError::io(
            "/srv/text_cache",
            "read attribute",
            io::Error::new(io::ErrorKind::TimedOut, "slow disk"),
        );
        assert!(timed_out.is_transient());
    }
}
