//! Text attribute cache
//!
//! This crate keeps large text values out of a host's primary record store:
//! - Sharded, content-addressed paths derived from an entity's type and id
//! - Durable filesystem and ephemeral in-memory storage backends
//! - Optional deflate compression with an encoding tag
//! - Lazily loaded, dirty-tracked attribute slots with explicit commit
//!
//! ```no_run
//! use textcache::{EntityIdentity, MemoryStore, TextAttribute, TextStore};
//!
//! # fn main() -> textcache::Result<()> {
//! let store = TextStore::in_memory(&MemoryStore::new());
//! let identity = EntityIdentity::new("Article", 5);
//!
//! let mut body = TextAttribute::new("body")?;
//! body.set(&store, &identity, "hello")?;
//! body.commit(&store, &identity)?;
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod config;
pub mod errors;
pub mod paths;
pub mod storage;
pub mod store;

pub use attribute::{SlotState, TextAttribute, TextAttributeSet};
pub use config::{ConfigSource, TextCacheConfig, TextCacheConfigBuilder};
pub use errors::{CacheError, Error, RecoveryHint, Result};
pub use paths::{CachePath, PathResolver};
pub use storage::{
    BackendKind, Blob, CompressedStorage, CompressionConfig, Encoding, FileSystemStorage,
    InstrumentedStorage, MemoryStorage, MemoryStore, StorageStats, TextStorage,
};
pub use store::TextStore;
pub use textcache_core::{EntityIdentity, Environment};
