//! Shared test utilities for integration tests
//!
//! Each `TestRepo` owns a fresh temporary work tree with an initialized
//! `.gat` directory, so tests never share repository state.

use gat::{CommitGraph, ObjectId, ObjectStore, RefManager, Repository, SnapshotBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestRepo {
    _dir: TempDir,
    pub repo: Repository,
    pub store: ObjectStore,
    pub refs: RefManager,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let refs = RefManager::new(&repo);
        Self {
            _dir: dir,
            repo,
            store,
            refs,
        }
    }

    pub fn root(&self) -> &Path {
        self.repo.work_tree()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a file relative to the work tree, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn snapshot(&self) -> ObjectId {
        SnapshotBuilder::new(&self.store).build(self.root()).unwrap()
    }

    /// Snapshot the work tree and commit it on top of the current head.
    pub fn commit(&self, message: &str) -> ObjectId {
        let tree = self.snapshot();
        let parent = self.refs.current_head().unwrap();
        CommitGraph::new(&self.store, &self.refs)
            .create_commit(&tree, parent.as_ref(), message)
            .unwrap()
    }
}

/// Every regular file under `root` (outside `.gat`) keyed by relative path,
/// plus every directory keyed with a trailing slash.
pub fn listing(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    let mut out = BTreeMap::new();
    collect(root, root, &mut out);
    out
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, Option<Vec<u8>>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.file_name() == ".gat" {
            continue;
        }
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        if path.is_dir() {
            out.insert(format!("{}/", rel), None);
            collect(root, &path, out);
        } else {
            out.insert(rel, Some(fs::read(&path).unwrap()));
        }
    }
}
