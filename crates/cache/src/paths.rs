//! Deterministic, sharded storage locations for entity attributes
//!
//! An entity's `<type>_<id>` identifier is hashed with SHA-256 and the first
//! nine hex characters become three shard directories, so the layout is
//! `root/XXX/YYY/ZZZ/<type>_<id>/<attribute>`. Sharding bounds the number of
//! entries in any one directory as entity counts grow.
//!
//! The digest is SHA-256, not MD5. Directories written by MD5-sharded stores
//! use different shard prefixes and are not found by this resolver.

use crate::errors::{CacheError, RecoveryHint, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use textcache_core::{EntityIdentity, DEFAULT_ROOT_DIR, SHARD_LEVELS, SHARD_WIDTH};

/// Location of one entity's attribute directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CachePath {
    root: PathBuf,
    shards: [String; SHARD_LEVELS],
    identifier: String,
}

impl CachePath {
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn shards(&self) -> &[String] {
        &self.shards
    }

    /// The `<type>_<id>` leaf directory name
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Directory holding every attribute file of the entity
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        let mut dir = self.root.clone();
        for shard in &self.shards {
            dir.push(shard);
        }
        dir.push(&self.identifier);
        dir
    }

    /// File holding a single attribute
    pub fn attribute_path(&self, attribute: &str) -> Result<PathBuf> {
        validate_attribute_name(attribute)?;
        Ok(self.dir().join(attribute))
    }

    /// Flattened `/`-separated key for the attribute, stable across platforms
    pub fn storage_key(&self, attribute: &str) -> Result<String> {
        validate_attribute_name(attribute)?;
        let root = self.root.to_string_lossy().replace('\\', "/");
        let root = root.trim_end_matches('/');
        Ok(format!(
            "{root}/{}/{}/{attribute}",
            self.shards.join("/"),
            self.identifier
        ))
    }
}

impl fmt::Display for CachePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir().display())
    }
}

/// Maps entity identities to storage paths under a fixed root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_DIR)
    }
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the storage path for an identity.
    ///
    /// Identities without an id are rejected with `MissingIdentity`; there is
    /// no path for an entity that has not been persisted.
    pub fn resolve(&self, identity: &EntityIdentity) -> Result<CachePath> {
        if identity.type_name().is_empty() {
            return Err(invalid_identity(identity, "type name must not be empty"));
        }

        let identifier = identity
            .identifier()
            .ok_or_else(|| CacheError::missing_identity(identity.type_name(), "resolve storage path"))?;

        if identifier.contains(['/', '\\', '\0']) {
            return Err(invalid_identity(
                identity,
                "identifier must not contain path separators",
            ));
        }

        Ok(CachePath {
            root: self.root.clone(),
            shards: shard_prefix(&digest_hex(&identifier)),
            identifier,
        })
    }

    /// Resolve a path straight from a type name and id
    pub fn resolve_parts(&self, type_name: &str, id: impl ToString) -> Result<CachePath> {
        self.resolve(&EntityIdentity::new(type_name, id))
    }
}

/// Lowercase hex SHA-256 digest of an identifier
#[must_use]
pub fn digest_hex(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hex::encode(hasher.finalize())
}

/// Split the leading characters of a hex digest into shard directory names
fn shard_prefix(digest: &str) -> [String; SHARD_LEVELS] {
    std::array::from_fn(|level| {
        let start = level * SHARD_WIDTH;
        digest[start..start + SHARD_WIDTH].to_string()
    })
}

pub(crate) fn validate_attribute_name(attribute: &str) -> Result<()> {
    if attribute.is_empty()
        || attribute == "."
        || attribute == ".."
        || attribute.contains(['/', '\\', '\0'])
    {
        return Err(CacheError::configuration(format!(
            "attribute name '{attribute}' must be a single non-empty path segment"
        )));
    }
    Ok(())
}

fn invalid_identity(identity: &EntityIdentity, reason: &str) -> CacheError {
    CacheError::InvalidIdentity {
        identity: identity.to_string(),
        reason: reason.to_string(),
        recovery_hint: RecoveryHint::NoRecovery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_layout_matches_shard_scheme() {
        let resolver = PathResolver::new("text_cache");
        let path = resolver.resolve_parts("TestModel", 5).unwrap();
        let digest = digest_hex("TestModel_5");

        assert_eq!(path.identifier(), "TestModel_5");
        assert_eq!(
            path.shards(),
            &[
                digest[0..3].to_string(),
                digest[3..6].to_string(),
                digest[6..9].to_string()
            ]
        );

        let expected = Path::new("text_cache")
            .join(&digest[0..3])
            .join(&digest[3..6])
            .join(&digest[6..9])
            .join("TestModel_5")
            .join("foo");
        assert_eq!(path.attribute_path("foo").unwrap(), expected);
    }

    #[test]
    fn test_digest_is_sha256_hex() {
        // Known SHA-256 of the empty string
        assert_eq!(
            digest_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_same_identity_same_path_different_id_different_path() {
        let resolver = PathResolver::default();
        let a = resolver.resolve(&EntityIdentity::new("TestModel", 2)).unwrap();
        let b = resolver.resolve(&EntityIdentity::new("TestModel", 2)).unwrap();
        let c = resolver.resolve(&EntityIdentity::new("TestModel", 3)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.dir().starts_with(DEFAULT_ROOT_DIR));
    }

    #[test]
    fn test_transient_identity_is_rejected() {
        let err = PathResolver::default()
            .resolve(&EntityIdentity::transient("TestModel"))
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(matches!(err, CacheError::MissingIdentity { .. }));
    }

    #[test]
    fn test_unsafe_identities_are_rejected() {
        let resolver = PathResolver::default();
        assert!(resolver.resolve_parts("", 1).unwrap_err().is_precondition());
        assert!(resolver
            .resolve_parts("TestModel", "../../etc")
            .unwrap_err()
            .is_precondition());
    }

    #[test]
    fn test_attribute_names_must_be_single_segments() {
        let path = PathResolver::default().resolve_parts("TestModel", 1).unwrap();
        assert!(path.attribute_path("body").is_ok());
        assert!(path.attribute_path("").is_err());
        assert!(path.attribute_path("..").is_err());
        assert!(path.storage_key("a/b").is_err());
    }

    #[test]
    fn test_storage_key_uses_forward_slashes() {
        let path = PathResolver::new("cache/").resolve_parts("TestModel", 5).unwrap();
        let key = path.storage_key("foo").unwrap();
        assert!(key.starts_with("cache/"));
        assert!(!key.contains("//"));
        assert!(key.ends_with("/TestModel_5/foo"));
        assert_eq!(key.split('/').count(), 6);
    }

    proptest! {
        #[test]
        fn proptest_resolution_is_pure(
            type_name in "[A-Z][a-zA-Z0-9]{0,20}",
            id in any::<u64>()
        ) {
            let resolver = PathResolver::new("root");
            let first = resolver.resolve_parts(&type_name, id).unwrap();
            let second = resolver.resolve_parts(&type_name, id).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.dir(), second.dir());
            for shard in first.shards() {
                prop_assert_eq!(shard.len(), SHARD_WIDTH);
                prop_assert!(shard.chars().all(|c| c.is_ascii_hexdigit()));
            }
        }

        #[test]
        fn proptest_distinct_ids_give_distinct_paths(
            a in any::<u64>(),
            b in any::<u64>()
        ) {
            prop_assume!(a != b);
            let resolver = PathResolver::default();
            let pa = resolver.resolve_parts("TestModel", a).unwrap();
            let pb = resolver.resolve_parts("TestModel", b).unwrap();
            prop_assert_ne!(pa.dir(), pb.dir());
        }
    }
}
