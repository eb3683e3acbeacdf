use crate::errors::Result;
use crate::paths::validate_attribute_name;
use crate::storage::Blob;
use crate::store::TextStore;
use std::fmt;
use std::path::PathBuf;
use textcache_core::EntityIdentity;
use textcache_utils::tracing::{attribute_span, debug, trace};

/// Lifecycle state of an attribute slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Nothing fetched yet
    Unloaded,
    /// Value fetched from storage, or defaulted to absent
    Loaded,
    /// Value assigned and not yet committed
    Overridden,
    /// Stored value removed; the next read fetches again
    Removed,
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Unloaded => write!(f, "unloaded"),
            SlotState::Loaded => write!(f, "loaded"),
            SlotState::Overridden => write!(f, "overridden"),
            SlotState::Removed => write!(f, "removed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Unloaded,
    Removed,
    Held(Option<String>),
}

/// A single named text attribute of one entity instance.
///
/// The slot never stores the identity; every operation takes the store and
/// the entity's current identity, so an entity that gains an id after save
/// keeps using the same slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAttribute {
    name: String,
    value: Value,
    /// Captured at the first mutation since creation or the last commit
    baseline: Option<Option<String>>,
}

impl TextAttribute {
    /// Create an unloaded slot; the name must be a single path segment
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_attribute_name(&name)?;
        Ok(Self {
            name,
            value: Value::Unloaded,
            baseline: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SlotState {
        match (&self.value, &self.baseline) {
            (Value::Unloaded, _) => SlotState::Unloaded,
            (Value::Removed, _) => SlotState::Removed,
            (Value::Held(_), Some(_)) => SlotState::Overridden,
            (Value::Held(_), None) => SlotState::Loaded,
        }
    }

    /// Whether a value (possibly absent) is held in memory
    pub fn is_loaded(&self) -> bool {
        matches!(self.value, Value::Held(_))
    }

    /// Current value, reading storage at most once.
    ///
    /// An absent read result is cached too. Entities without an id resolve
    /// to absent without touching storage.
    pub fn get(&mut self, store: &TextStore, identity: &EntityIdentity) -> Result<Option<&str>> {
        if !self.is_loaded() {
            let loaded = self.load(store, identity)?;
            self.value = Value::Held(loaded);
        }

        match &self.value {
            Value::Held(value) => Ok(value.as_deref()),
            Value::Unloaded | Value::Removed => Ok(None),
        }
    }

    /// Assign a new value
    pub fn set(
        &mut self,
        store: &TextStore,
        identity: &EntityIdentity,
        value: impl Into<String>,
    ) -> Result<()> {
        self.assign(store, identity, Some(value.into()))
    }

    /// Assign the absent value; committing it removes the stored bytes
    pub fn unset(&mut self, store: &TextStore, identity: &EntityIdentity) -> Result<()> {
        self.assign(store, identity, None)
    }

    /// Assign an optional value
    pub fn assign(
        &mut self,
        store: &TextStore,
        identity: &EntityIdentity,
        value: Option<String>,
    ) -> Result<()> {
        if self.baseline.is_none() {
            let current = self.get(store, identity)?.map(str::to_owned);
            self.baseline = Some(current);
        }
        self.value = Value::Held(value);
        Ok(())
    }

    /// True iff a baseline exists and the held value differs from it
    pub fn is_changed(&self) -> bool {
        match (&self.baseline, &self.value) {
            (Some(baseline), Value::Held(current)) => baseline != current,
            _ => false,
        }
    }

    /// Persist the held value if it changed.
    ///
    /// Returns whether storage was touched. The baseline is cleared after
    /// every successful call; a failed write leaves the slot dirty.
    pub fn commit(&mut self, store: &TextStore, identity: &EntityIdentity) -> Result<bool> {
        if !self.is_changed() {
            self.baseline = None;
            return Ok(false);
        }

        let _span = attribute_span("commit", &self.name).entered();
        let path = store.path_for(identity)?;
        match &self.value {
            Value::Held(Some(text)) => {
                store
                    .storage()
                    .write(&path, &self.name, &Blob::from_text(text.as_str()))?;
            }
            // Committing the absent value drops whatever was stored
            _ => store.storage().remove(&path, &self.name)?,
        }

        self.baseline = None;
        debug!(identity = %identity, "committed text attribute");
        Ok(true)
    }

    /// Forget the held value and delete the stored bytes
    pub fn remove(&mut self, store: &TextStore, identity: &EntityIdentity) -> Result<()> {
        self.value = Value::Removed;
        self.baseline = None;

        if !identity.is_persistable() {
            return Ok(());
        }

        let _span = attribute_span("remove", &self.name).entered();
        let path = store.path_for(identity)?;
        store.storage().remove(&path, &self.name)
    }

    /// Whether a value exists.
    ///
    /// A non-absent value held in memory counts. Otherwise storage is asked,
    /// unless the entity has no id yet.
    pub fn exists(&self, store: &TextStore, identity: &EntityIdentity) -> Result<bool> {
        if matches!(self.value, Value::Held(Some(_))) {
            return Ok(true);
        }
        if !identity.is_persistable() {
            return Ok(false);
        }

        let path = store.path_for(identity)?;
        store.storage().exists(&path, &self.name)
    }

    /// Location of this attribute's stored bytes
    pub fn path(&self, store: &TextStore, identity: &EntityIdentity) -> Result<PathBuf> {
        store.path_for(identity)?.attribute_path(&self.name)
    }

    fn load(&self, store: &TextStore, identity: &EntityIdentity) -> Result<Option<String>> {
        let _span = attribute_span("load", &self.name).entered();

        if !identity.is_persistable() {
            trace!(identity = %identity, "entity has no id, defaulting to absent");
            return Ok(None);
        }

        let path = store.path_for(identity)?;
        match store.storage().read(&path, &self.name)? {
            Some(blob) => {
                trace!(identity = %identity, bytes = blob.len(), "loaded text attribute");
                let key = path.storage_key(&self.name)?;
                blob.into_text(&key).map(Some)
            }
            None => {
                trace!(identity = %identity, "no stored value");
                Ok(None)
            }
        }
    }
}
