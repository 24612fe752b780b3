//! One file, one commit, one revert into an emptied work tree.

use super::test_utils::{listing, TestRepo};
use gat::CheckoutEngine;
use std::collections::HashSet;
use std::fs;

#[test]
fn test_single_file_commit_and_revert() {
    let t = TestRepo::new();
    t.write("a.txt", "hello");

    let before: HashSet<_> = t.store.list().unwrap().into_iter().collect();
    let commit = t.commit("add a.txt");
    let after: HashSet<_> = t.store.list().unwrap().into_iter().collect();

    // blob, root tree, commit
    assert_eq!(after.difference(&before).count(), 3);
    assert!(after.contains(&commit));

    let main_ref = fs::read_to_string(t.repo.heads_dir().join("main")).unwrap();
    assert_eq!(main_ref.trim(), commit.as_str());

    fs::remove_file(t.path("a.txt")).unwrap();
    assert!(listing(t.root()).is_empty());

    CheckoutEngine::new(&t.repo, &t.store, &t.refs)
        .revert_to_commit(&commit)
        .unwrap();

    let restored = listing(t.root());
    assert_eq!(restored.len(), 1);
    assert_eq!(restored["a.txt"].as_deref(), Some(&b"hello"[..]));
}
