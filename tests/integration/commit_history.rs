//! Commit creation and history walking

use super::test_utils::TestRepo;
use gat::{CommitGraph, ObjectId, StorageError};

#[test]
fn test_history_from_child_yields_child_then_root() {
    let t = TestRepo::new();
    t.write("f.txt", "1");
    let a = t.commit("A");
    t.write("f.txt", "2");
    let b = t.commit("B");

    let graph = CommitGraph::new(&t.store, &t.refs);
    let ids: Vec<ObjectId> = graph.history(&b).map(|item| item.unwrap().0).collect();
    assert_eq!(ids, vec![b.clone(), a.clone()]);

    let root = graph.read_commit(&a).unwrap();
    assert!(root.parent.is_none());
    assert_eq!(graph.read_commit(&b).unwrap().parent, Some(a));
}

#[test]
fn test_history_is_lazy_and_restartable_from_any_commit() {
    let t = TestRepo::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        t.write("counter.txt", &i.to_string());
        ids.push(t.commit(&format!("commit {}", i)));
    }

    let graph = CommitGraph::new(&t.store, &t.refs);
    let newest_two: Vec<_> = graph
        .history(&ids[4])
        .take(2)
        .map(|item| item.unwrap().1.message)
        .collect();
    assert_eq!(newest_two, vec!["commit 4", "commit 3"]);

    assert_eq!(graph.history(&ids[2]).count(), 3);
}

#[test]
fn test_commit_tree_matches_snapshot() {
    let t = TestRepo::new();
    t.write("dir/file.txt", "content");
    let tree = t.snapshot();
    let commit = t.commit("snapshot");

    let record = CommitGraph::new(&t.store, &t.refs).read_commit(&commit).unwrap();
    assert_eq!(record.tree, tree);
}

#[test]
fn test_history_surfaces_corrupt_commit_and_stops() {
    let t = TestRepo::new();
    t.write("f.txt", "1");
    let a = t.commit("A");
    t.write("f.txt", "2");
    let b = t.commit("B");

    std::fs::write(t.store.object_path(&a), b"garbage").unwrap();

    let graph = CommitGraph::new(&t.store, &t.refs);
    let items: Vec<_> = graph.history(&b).collect();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(items[1], Err(StorageError::CorruptObject { .. })));
}

#[test]
fn test_empty_work_tree_can_be_committed() {
    let t = TestRepo::new();
    let commit = t.commit("nothing yet");
    let record = CommitGraph::new(&t.store, &t.refs).read_commit(&commit).unwrap();
    assert!(t.store.load(&record.tree).unwrap().is_empty());
}
