//! Snapshot builder: turns a directory into blob and tree objects

use crate::error::StorageError;
use crate::repository::is_reserved;
use crate::store::ObjectStore;
use crate::tree::entry::{validate_entry_name, EntryKind, Tree, TreeEntry};
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// Order in which rows are written into a tree object.
///
/// `Filesystem` keeps directory enumeration order, so identical content may
/// hash differently across platforms. `Name` sorts rows by name first, which
/// is deterministic but yields different hashes than `Filesystem`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrder {
    #[default]
    Filesystem,
    Name,
}

/// Builds tree snapshots of a directory into an object store
pub struct SnapshotBuilder<'a> {
    store: &'a ObjectStore,
    order: EntryOrder,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Self {
            store,
            order: EntryOrder::default(),
        }
    }

    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Snapshot `dir` and everything below it, returning the root tree hash.
    ///
    /// Any unreadable directory or failed object write aborts the whole build;
    /// objects already written stay in the store.
    #[instrument(skip_all, fields(root = %dir.display()))]
    pub fn build(&self, dir: &Path) -> Result<ObjectId, StorageError> {
        let start = Instant::now();
        info!("Starting snapshot build");

        let root = self.build_tree(dir)?;

        info!(
            tree = %root,
            duration_ms = start.elapsed().as_millis(),
            "Snapshot build completed"
        );
        Ok(root)
    }

    /// Depth-first: children are stored before the tree that lists them.
    fn build_tree(&self, dir: &Path) -> Result<ObjectId, StorageError> {
        let listing =
            fs::read_dir(dir).map_err(|e| StorageError::io("read directory", dir, e))?;

        let mut tree = Tree::new();
        for entry in listing {
            let entry = entry.map_err(|e| StorageError::io("read directory entry in", dir, e))?;
            let path = entry.path();
            let name = entry.file_name().into_string().map_err(|raw| {
                StorageError::InvalidPath(format!("non-UTF-8 file name {:?} in {:?}", raw, dir))
            })?;

            let file_type = entry
                .file_type()
                .map_err(|e| StorageError::io("read file type of", &path, e))?;

            if file_type.is_file() {
                check_name(&name, EntryKind::Blob, &path)?;
                let blob = self.store.store_file(&path)?;
                trace!(path = %path.display(), blob = %blob, "Stored blob");
                tree.push(TreeEntry::blob(blob, name));
            } else if is_reserved(&name) {
                trace!(path = %path.display(), "Skipping reserved directory");
            } else if file_type.is_dir() {
                check_name(&name, EntryKind::Tree, &path)?;
                let child = self.build_tree(&path)?;
                tree.push(TreeEntry::tree(child, name));
            } else {
                warn!(path = %path.display(), "Skipping symlink or special file");
            }
        }

        if self.order == EntryOrder::Name {
            tree.sort_by_name();
        }

        let id = self.store.store(&tree.encode())?;
        debug!(path = %dir.display(), tree = %id, entries = tree.len(), "Stored tree");
        Ok(id)
    }
}

fn check_name(name: &str, kind: EntryKind, path: &Path) -> Result<(), StorageError> {
    validate_entry_name(name, kind)
        .map_err(|reason| StorageError::InvalidPath(format!("{:?}: {}", path, reason)))
}
