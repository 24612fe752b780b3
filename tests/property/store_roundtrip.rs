//! Property-based tests for object round trips and tree/commit codecs

use gat::{Commit, ObjectId, ObjectStore, Repository, Tree, TreeEntry};
use proptest::prelude::*;
use tempfile::TempDir;

fn object_id() -> impl Strategy<Value = ObjectId> {
    "[0-9a-f]{64}".prop_map(|hex| ObjectId::from_hex(&hex).unwrap())
}

/// Names a snapshot can contain: no separators, not `.`/`..`, not reserved.
fn entry_name() -> impl Strategy<Value = String> {
    "[^\t\n/\u{0}]{1,24}".prop_filter("reserved or relative name", |name| {
        !matches!(name.as_str(), "." | ".." | ".git" | ".gat")
    })
}

/// Test that load(store(b)) == b for arbitrary payloads
#[test]
fn test_store_load_round_trip_property() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();
    let store = ObjectStore::new(&repo);

    let mut runner = proptest::test_runner::TestRunner::default();
    runner
        .run(&prop::collection::vec(any::<u8>(), 0..4096), |payload| {
            let first = store.store(&payload).unwrap();
            let second = store.store(&payload).unwrap();

            // Same content always lands at the same address
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(store.load(&first).unwrap(), payload);
            Ok(())
        })
        .unwrap();
}

/// Test that tree encoding preserves entries and their order
#[test]
fn test_tree_codec_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let rows = prop::collection::vec((any::<bool>(), object_id(), entry_name()), 0..16);

    runner
        .run(&rows, |rows| {
            let mut tree = Tree::new();
            for (is_dir, id, name) in rows {
                tree.push(if is_dir {
                    TreeEntry::tree(id, name)
                } else {
                    TreeEntry::blob(id, name)
                });
            }

            let id = ObjectId::from_hex(&"0".repeat(64)).unwrap();
            let encoded = tree.encode();
            let parsed = Tree::parse(&id, &encoded).unwrap();
            prop_assert_eq!(&parsed, &tree);
            prop_assert_eq!(parsed.encode(), encoded);
            Ok(())
        })
        .unwrap();
}

/// Test that any message survives commit encoding, including newlines and
/// text that looks like header fields
#[test]
fn test_commit_codec_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let inputs = (
        object_id(),
        prop::option::of(object_id()),
        any::<String>(),
        any::<i64>(),
    );

    runner
        .run(&inputs, |(tree, parent, message, timestamp)| {
            let commit = Commit::new(tree, parent, message, timestamp);
            let id = ObjectId::from_hex(&"1".repeat(64)).unwrap();
            prop_assert_eq!(Commit::parse(&id, &commit.encode()).unwrap(), commit);
            Ok(())
        })
        .unwrap();
}
