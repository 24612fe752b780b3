//! Snapshot a work tree, then reconcile other directories to that snapshot.

use super::test_utils::{listing, TestRepo};
use gat::tree::read_tree;
use gat::{CheckoutEngine, EntryKind, EntryOrder, SnapshotBuilder};
use std::fs;
use tempfile::TempDir;

fn populate(t: &TestRepo) {
    t.write("README.md", "# project\n");
    t.write("src/main.rs", "fn main() {}\n");
    t.write("src/util/mod.rs", "pub mod strings;\n");
    t.write("src/util/strings.rs", "");
    t.write("assets/logo.bin", "\u{0}\u{1}\u{2}binary");
    fs::create_dir_all(t.path("empty/nested")).unwrap();
}

#[test]
fn test_reconcile_empty_directory_reproduces_snapshot() {
    let t = TestRepo::new();
    populate(&t);
    let tree = t.snapshot();

    let target = TempDir::new().unwrap();
    CheckoutEngine::new(&t.repo, &t.store, &t.refs)
        .reconcile(target.path(), &tree)
        .unwrap();

    assert_eq!(listing(target.path()), listing(t.root()));
}

#[test]
fn test_reconcile_removes_exactly_the_extra_entries() {
    let t = TestRepo::new();
    populate(&t);
    let tree = t.snapshot();
    let expected = listing(t.root());

    t.write("scratch.txt", "temporary");
    t.write("build/out/artifact.o", "obj");
    t.write("src/util/extra.rs", "// stray");

    CheckoutEngine::new(&t.repo, &t.store, &t.refs)
        .reconcile(t.root(), &tree)
        .unwrap();

    assert_eq!(listing(t.root()), expected);
    assert!(t.repo.root().join("HEAD").is_file());
}

#[test]
fn test_reconcile_leaves_git_directory_alone() {
    let t = TestRepo::new();
    t.write("tracked.txt", "tracked");
    let tree = t.snapshot();
    t.write(".git/config", "[core]");

    CheckoutEngine::new(&t.repo, &t.store, &t.refs)
        .reconcile(t.root(), &tree)
        .unwrap();
    assert_eq!(fs::read_to_string(t.path(".git/config")).unwrap(), "[core]");
}

#[test]
fn test_identical_subdirectories_share_a_tree_object() {
    let t = TestRepo::new();
    t.write("a/same.txt", "same");
    t.write("b/same.txt", "same");

    let root = read_tree(&t.store, &t.snapshot()).unwrap();
    let subtrees: Vec<_> = root.subtrees().collect();
    assert_eq!(subtrees.len(), 2);
    assert_eq!(subtrees[0].id, subtrees[1].id);
}

#[test]
fn test_tree_rows_reference_stored_children() {
    let t = TestRepo::new();
    populate(&t);
    let root = read_tree(&t.store, &t.snapshot()).unwrap();

    for entry in root.entries() {
        assert!(t.store.contains(&entry.id), "{} missing", entry.name);
        if entry.kind == EntryKind::Tree {
            read_tree(&t.store, &entry.id).unwrap();
        }
    }
}

#[test]
fn test_name_order_is_independent_of_creation_order() {
    let first = TestRepo::new();
    for name in ["c.txt", "a.txt", "b.txt"] {
        first.write(name, name);
    }
    let second = TestRepo::new();
    for name in ["b.txt", "c.txt", "a.txt"] {
        second.write(name, name);
    }

    let build = |t: &TestRepo| {
        SnapshotBuilder::new(&t.store)
            .with_order(EntryOrder::Name)
            .build(t.root())
            .unwrap()
    };
    assert_eq!(build(&first), build(&second));
}
