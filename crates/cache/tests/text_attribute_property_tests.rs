//! Property-based tests for attribute slots
//!
//! These check memoisation, idempotent commit and text round trips across
//! arbitrary values and identities.

use proptest::prelude::*;
use textcache::{
    CompressedStorage, EntityIdentity, InstrumentedStorage, MemoryStorage, MemoryStore,
    TextAttribute, TextStore,
};

fn arb_type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,20}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,64}",
        "\\PC{0,512}",
        prop::collection::vec(any::<char>(), 0..256).prop_map(|chars| chars.into_iter().collect()),
    ]
}

proptest! {
    #[test]
    fn committed_text_is_read_back_by_a_fresh_slot(
        type_name in arb_type_name(),
        id in 1u64..1_000_000,
        text in arb_text(),
        compressed in any::<bool>(),
    ) {
        let memory = MemoryStore::new();
        let store = if compressed {
            TextStore::with_storage("text_cache", CompressedStorage::new(MemoryStorage::new(memory.clone())))
        } else {
            TextStore::in_memory(&memory)
        };
        let identity = EntityIdentity::new(type_name, id);

        let mut writer = TextAttribute::new("body").unwrap();
        writer.set(&store, &identity, text.clone()).unwrap();
        writer.commit(&store, &identity).unwrap();

        let mut reader = TextAttribute::new("body").unwrap();
        prop_assert_eq!(reader.get(&store, &identity).unwrap(), Some(text.as_str()));
    }

    #[test]
    fn repeated_gets_read_once_and_repeated_commits_write_once(
        text in arb_text(),
        gets in 1usize..8,
        commits in 1usize..5,
    ) {
        let storage = InstrumentedStorage::new(MemoryStorage::default());
        let stats = storage.stats();
        let store = TextStore::with_storage("text_cache", storage);
        let identity = EntityIdentity::new("TestModel", 1);
        let mut slot = TextAttribute::new("foo").unwrap();

        for _ in 0..gets {
            slot.get(&store, &identity).unwrap();
        }
        prop_assert_eq!(stats.reads(), 1);

        slot.set(&store, &identity, text.clone()).unwrap();
        for _ in 0..commits {
            slot.commit(&store, &identity).unwrap();
        }

        // Setting the empty string over an absent value is still a change
        prop_assert_eq!(stats.writes(), 1);
        prop_assert_eq!(stats.reads(), 1);
    }
}
