//! gat: Minimal Content-Addressed Version Control
//!
//! Snapshots a directory tree into immutable, content-addressed objects,
//! links snapshots into a single-parent commit history, and reconciles a
//! working directory against any historical snapshot.

pub mod api;
pub mod checkout;
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod logging;
pub mod refs;
pub mod repository;
pub mod store;
pub mod tree;
pub mod types;

pub use api::RepositoryApi;
pub use checkout::{CheckoutEngine, CheckoutSummary};
pub use commit::{Commit, CommitGraph, History};
pub use error::{ApiError, StorageError};
pub use refs::{BranchCreation, RefManager};
pub use repository::Repository;
pub use store::ObjectStore;
pub use tree::{EntryKind, EntryOrder, SnapshotBuilder, Tree, TreeEntry};
pub use types::ObjectId;
