//! Branch creation, switching and HEAD rollback

use super::test_utils::TestRepo;
use gat::{BranchCreation, CheckoutEngine, StorageError};
use std::fs;

#[test]
fn test_feature_branch_round_trip_returns_to_same_commit() {
    let t = TestRepo::new();
    t.write("base.txt", "base");
    t.commit("base");
    t.write("base.txt", "main-only");
    t.commit("main tip");

    assert_eq!(t.refs.create_branch("feature").unwrap(), BranchCreation::Created);
    t.write("feature.txt", "feature");
    let c = t.commit("feature tip");

    let engine = CheckoutEngine::new(&t.repo, &t.store, &t.refs);
    engine.switch_branch("main").unwrap();
    assert!(!t.path("feature.txt").exists());
    assert_eq!(fs::read_to_string(t.path("base.txt")).unwrap(), "main-only");

    engine.switch_branch("feature").unwrap();
    assert_eq!(t.refs.current_head().unwrap(), Some(c));
    assert_eq!(fs::read_to_string(t.path("feature.txt")).unwrap(), "feature");
}

#[test]
fn test_new_branch_starts_at_current_head() {
    let t = TestRepo::new();
    t.write("a.txt", "a");
    let head = t.commit("first");

    t.refs.create_branch("topic").unwrap();
    assert_eq!(t.refs.branch_head("topic").unwrap(), Some(head.clone()));
    assert_eq!(t.refs.branch_head("main").unwrap(), Some(head));
    assert_eq!(t.refs.current_branch().unwrap(), "topic");
}

#[test]
fn test_branch_on_fresh_repository_has_no_commits() {
    let t = TestRepo::new();
    assert_eq!(t.refs.create_branch("early").unwrap(), BranchCreation::Created);
    assert_eq!(t.refs.current_head().unwrap(), None);
}

#[test]
fn test_failed_switch_keeps_previous_branch_and_files() {
    let t = TestRepo::new();
    t.write("keep.txt", "keep");
    t.commit("first");

    let engine = CheckoutEngine::new(&t.repo, &t.store, &t.refs);
    let err = engine.switch_branch("missing").unwrap_err();
    assert!(matches!(err, StorageError::RefNotFound(_)));
    assert_eq!(t.refs.current_branch().unwrap(), "main");
    assert_eq!(
        fs::read_to_string(t.repo.head_file()).unwrap(),
        "refs/heads/main"
    );
    assert!(t.path("keep.txt").exists());
}

#[test]
fn test_switch_to_branch_with_corrupt_tree_rolls_back_head() {
    let t = TestRepo::new();
    t.write("a.txt", "a");
    t.commit("first");
    t.refs.create_branch("broken").unwrap();
    t.write("b.txt", "b");
    let broken_tip = t.commit("second");

    let record = gat::CommitGraph::new(&t.store, &t.refs)
        .read_commit(&broken_tip)
        .unwrap();
    fs::write(t.store.object_path(&record.tree), b"not zlib").unwrap();

    let engine = CheckoutEngine::new(&t.repo, &t.store, &t.refs);
    engine.switch_branch("main").unwrap();
    let err = engine.switch_branch("broken").unwrap_err();
    assert!(matches!(err, StorageError::CorruptObject { .. }));
    assert_eq!(t.refs.current_branch().unwrap(), "main");
}
