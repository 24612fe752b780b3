//! Checkout: reconcile a live directory with a stored tree.
//!
//! Each directory level is handled in three passes: prune live entries the
//! target tree does not list (by name and kind), materialize every target
//! entry, then recurse into the target's subtrees. Reserved metadata
//! directories are never touched.
//!
//! Reconciliation is not transactional. A failure partway leaves the work
//! tree partially updated; only the HEAD switch of `switch_branch` is rolled
//! back.

use crate::commit::CommitGraph;
use crate::error::StorageError;
use crate::refs::RefManager;
use crate::repository::{is_reserved, Repository};
use crate::store::ObjectStore;
use crate::tree::{read_tree, EntryKind, Tree};
use crate::types::ObjectId;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

/// Counts of filesystem changes made by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub files_written: usize,
    pub dirs_created: usize,
    pub entries_removed: usize,
}

pub struct CheckoutEngine<'a> {
    store: &'a ObjectStore,
    refs: &'a RefManager,
    work_tree: PathBuf,
}

impl<'a> CheckoutEngine<'a> {
    pub fn new(repo: &Repository, store: &'a ObjectStore, refs: &'a RefManager) -> Self {
        Self {
            store,
            refs,
            work_tree: repo.work_tree().to_path_buf(),
        }
    }

    /// Make `dir` match the tree `tree` exactly.
    #[instrument(skip_all, fields(dir = %dir.display(), tree = %tree))]
    pub fn reconcile(&self, dir: &Path, tree: &ObjectId) -> Result<CheckoutSummary, StorageError> {
        let start = Instant::now();
        let mut summary = CheckoutSummary::default();
        self.reconcile_dir(dir, tree, &mut summary)?;

        info!(
            files_written = summary.files_written,
            dirs_created = summary.dirs_created,
            entries_removed = summary.entries_removed,
            duration_ms = start.elapsed().as_millis(),
            "Reconciled directory"
        );
        Ok(summary)
    }

    /// Restore the work tree to `commit` and point the active branch at it.
    pub fn revert_to_commit(&self, commit: &ObjectId) -> Result<CheckoutSummary, StorageError> {
        let record = CommitGraph::new(self.store, self.refs).read_commit(commit)?;
        let summary = self.reconcile(&self.work_tree, &record.tree)?;
        self.refs.advance_current_branch(commit)?;
        info!(commit = %commit, "Reverted to commit");
        Ok(summary)
    }

    /// Switch HEAD to `name` and check out its head commit.
    ///
    /// On failure HEAD is put back on the previous branch. Files already
    /// rewritten in the work tree stay as they are.
    pub fn switch_branch(&self, name: &str) -> Result<(ObjectId, CheckoutSummary), StorageError> {
        let previous = self.refs.current_branch()?;
        self.refs.switch_head(name)?;

        match self.checkout_head(name) {
            Ok(result) => {
                info!(from = %previous, to = %name, commit = %result.0, "Switched branch");
                Ok(result)
            }
            Err(e) => {
                warn!(branch = %name, error = %e, "Checkout failed, restoring HEAD");
                if let Err(rollback) = self.refs.switch_head(&previous) {
                    error!(branch = %previous, error = %rollback, "Failed to restore HEAD");
                }
                Err(e)
            }
        }
    }

    fn checkout_head(&self, name: &str) -> Result<(ObjectId, CheckoutSummary), StorageError> {
        let head = self.refs.current_head()?.ok_or_else(|| {
            StorageError::RefResolution(format!("branch {:?} has no commits", name))
        })?;
        let commit = CommitGraph::new(self.store, self.refs).read_commit(&head)?;
        let summary = self.reconcile(&self.work_tree, &commit.tree)?;
        Ok((head, summary))
    }

    fn reconcile_dir(
        &self,
        dir: &Path,
        tree_id: &ObjectId,
        summary: &mut CheckoutSummary,
    ) -> Result<(), StorageError> {
        let target = read_tree(self.store, tree_id)?;

        self.prune(dir, &target, summary)?;
        self.materialize(dir, &target, summary)?;

        for subtree in target.subtrees() {
            self.reconcile_dir(&dir.join(&subtree.name), &subtree.id, summary)?;
        }
        Ok(())
    }

    fn prune(
        &self,
        dir: &Path,
        target: &Tree,
        summary: &mut CheckoutSummary,
    ) -> Result<(), StorageError> {
        let listing = fs::read_dir(dir).map_err(|e| StorageError::io("read directory", dir, e))?;

        for entry in listing {
            let entry = entry.map_err(|e| StorageError::io("read directory entry in", dir, e))?;
            let path = entry.path();
            let file_name = entry.file_name();
            let name = file_name.to_str();
            let file_type = entry
                .file_type()
                .map_err(|e| StorageError::io("read file type of", &path, e))?;

            // Only a regular file may carry a reserved name into a tree.
            if !file_type.is_file() && name.is_some_and(is_reserved) {
                continue;
            }
            let listed = |kind| name.is_some_and(|n| target.contains(n, kind));

            if file_type.is_dir() {
                if !listed(EntryKind::Tree) {
                    fs::remove_dir_all(&path)
                        .map_err(|e| StorageError::io("remove directory", &path, e))?;
                    debug!(path = %path.display(), "Removed directory");
                    summary.entries_removed += 1;
                }
            } else if file_type.is_file() {
                if !listed(EntryKind::Blob) {
                    fs::remove_file(&path).map_err(|e| StorageError::io("remove file", &path, e))?;
                    debug!(path = %path.display(), "Removed file");
                    summary.entries_removed += 1;
                }
            } else {
                // Trees never list links or special files, so any such entry is extraneous.
                fs::remove_file(&path).map_err(|e| StorageError::io("remove", &path, e))?;
                debug!(path = %path.display(), "Removed symlink or special file");
                summary.entries_removed += 1;
            }
        }
        Ok(())
    }

    fn materialize(
        &self,
        dir: &Path,
        target: &Tree,
        summary: &mut CheckoutSummary,
    ) -> Result<(), StorageError> {
        for entry in target.entries() {
            let path = dir.join(&entry.name);
            match entry.kind {
                EntryKind::Tree => {
                    if !path.is_dir() {
                        fs::create_dir_all(&path)
                            .map_err(|e| StorageError::io("create directory", &path, e))?;
                        summary.dirs_created += 1;
                    }
                }
                EntryKind::Blob => {
                    let written = self.store.write_to_file(&entry.id, &path)?;
                    trace!(path = %path.display(), bytes = written, "Wrote file");
                    summary.files_written += 1;
                }
            }
        }
        Ok(())
    }
}
