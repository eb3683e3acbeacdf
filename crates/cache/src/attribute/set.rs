use super::TextAttribute;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::store::TextStore;
use textcache_core::EntityIdentity;
use textcache_utils::tracing::debug;

/// All text attributes declared by one host type, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAttributeSet {
    slots: Vec<TextAttribute>,
}

impl TextAttributeSet {
    /// Declare the attribute names; duplicates are rejected
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: Vec<TextAttribute> = Vec::new();
        for name in names {
            let slot = TextAttribute::new(name)?;
            if slots.iter().any(|existing| existing.name() == slot.name()) {
                return Err(CacheError::Configuration {
                    message: format!("text attribute '{}' declared twice", slot.name()),
                    recovery_hint: RecoveryHint::Manual {
                        instructions: "Declare each text attribute once".to_string(),
                    },
                });
            }
            slots.push(slot);
        }
        Ok(Self { slots })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(TextAttribute::name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TextAttribute> {
        self.slots.iter().find(|slot| slot.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TextAttribute> {
        self.slots.iter_mut().find(|slot| slot.name() == name)
    }

    /// Like `get_mut`, but an undeclared name is an error
    pub fn slot_mut(&mut self, name: &str) -> Result<&mut TextAttribute> {
        self.get_mut(name).ok_or_else(|| {
            CacheError::configuration(format!("no text attribute named '{name}' is declared"))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextAttribute> {
        self.slots.iter()
    }

    pub fn any_changed(&self) -> bool {
        self.slots.iter().any(TextAttribute::is_changed)
    }

    /// Names of the attributes with uncommitted changes
    pub fn changed(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.is_changed())
            .map(TextAttribute::name)
            .collect()
    }

    /// Commit every slot; run after the host record is saved.
    ///
    /// Stops at the first failure. Slots committed before it stay committed
    /// and the failing slot stays dirty.
    pub fn commit_all(&mut self, store: &TextStore, identity: &EntityIdentity) -> Result<usize> {
        let mut written = 0;
        for slot in &mut self.slots {
            if slot.commit(store, identity)? {
                written += 1;
            }
        }
        debug!(identity = %identity, written, "committed text attributes");
        Ok(written)
    }

    /// Remove every slot; run after the host record is destroyed
    pub fn remove_all(&mut self, store: &TextStore, identity: &EntityIdentity) -> Result<()> {
        for slot in &mut self.slots {
            slot.remove(store, identity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InstrumentedStorage, MemoryStorage, MemoryStore};

    #[test]
    fn test_declaration() {
        let set = TextAttributeSet::new(["body", "summary"]).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["body", "summary"]);
        assert_eq!(set.len(), 2);
        assert!(set.get("body").is_some());
        assert!(set.get("title").is_none());

        let err = TextAttributeSet::new(["body", "body"]).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
        assert!(TextAttributeSet::new(["ok", "not/ok"]).is_err());
    }

    #[test]
    fn test_slot_mut_rejects_undeclared_names() {
        let mut set = TextAttributeSet::new(["body"]).unwrap();
        assert!(set.slot_mut("body").is_ok());
        assert!(matches!(
            set.slot_mut("title"),
            Err(CacheError::Configuration { .. })
        ));
    }

    #[test]
    fn test_commit_all_writes_only_changed_slots() {
        let storage = InstrumentedStorage::new(MemoryStorage::new(MemoryStore::new()));
        let stats = storage.stats();
        let store = TextStore::with_storage("text_cache", storage);
        let identity = EntityIdentity::new("Article", 3);
        let mut set = TextAttributeSet::new(["body", "summary", "notes"]).unwrap();

        set.slot_mut("body").unwrap().set(&store, &identity, "text").unwrap();
        set.slot_mut("notes").unwrap().set(&store, &identity, "n").unwrap();
        assert!(set.any_changed());
        assert_eq!(set.changed(), vec!["body", "notes"]);

        assert_eq!(set.commit_all(&store, &identity).unwrap(), 2);
        assert!(!set.any_changed());
        assert_eq!(stats.writes(), 2);

        assert_eq!(set.commit_all(&store, &identity).unwrap(), 0);
        assert_eq!(stats.writes(), 2);
    }

    #[test]
    fn test_remove_all_clears_storage() {
        let memory = MemoryStore::new();
        let store = TextStore::in_memory(&memory);
        let identity = EntityIdentity::new("Article", 3);
        let mut set = TextAttributeSet::new(["body", "summary"]).unwrap();
        set.slot_mut("body").unwrap().set(&store, &identity, "a").unwrap();
        set.slot_mut("summary").unwrap().set(&store, &identity, "b").unwrap();
        set.commit_all(&store, &identity).unwrap();
        assert_eq!(memory.len(), 2);

        set.remove_all(&store, &identity).unwrap();

        assert!(memory.is_empty());
        for slot in set.iter() {
            assert!(!slot.exists(&store, &identity).unwrap());
        }
    }
}
