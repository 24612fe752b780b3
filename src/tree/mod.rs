//! Directory snapshots
//!
//! A working directory is stored as a tree of objects: files become blobs,
//! directories become tree objects listing their children by kind, hash and
//! name.

pub mod builder;
pub mod entry;

pub use builder::{EntryOrder, SnapshotBuilder};
pub use entry::{EntryKind, Tree, TreeEntry};

use crate::error::StorageError;
use crate::store::ObjectStore;
use crate::types::ObjectId;

/// Load a tree object and decode its rows.
pub fn read_tree(store: &ObjectStore, id: &ObjectId) -> Result<Tree, StorageError> {
    let bytes = store.load(id)?;
    Tree::parse(id, &bytes)
}
