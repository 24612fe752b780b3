//! Commit graph: creating commits and walking their parent chain.

use crate::commit::Commit;
use crate::error::StorageError;
use crate::refs::RefManager;
use crate::store::ObjectStore;
use crate::types::ObjectId;
use chrono::Utc;
use tracing::{debug, info, instrument};

pub struct CommitGraph<'a> {
    store: &'a ObjectStore,
    refs: &'a RefManager,
}

impl<'a> CommitGraph<'a> {
    pub fn new(store: &'a ObjectStore, refs: &'a RefManager) -> Self {
        Self { store, refs }
    }

    /// Store a commit of `tree` stamped with the current time and advance the
    /// active branch to it.
    #[instrument(skip_all, fields(tree = %tree))]
    pub fn create_commit(
        &self,
        tree: &ObjectId,
        parent: Option<&ObjectId>,
        message: &str,
    ) -> Result<ObjectId, StorageError> {
        let commit = Commit::new(
            tree.clone(),
            parent.cloned(),
            message,
            Utc::now().timestamp(),
        );
        let id = self.store.store(&commit.encode())?;
        self.refs.advance_current_branch(&id)?;

        info!(
            commit = %id,
            parent = parent.map(ObjectId::as_str).unwrap_or(""),
            "Created commit"
        );
        Ok(id)
    }

    pub fn read_commit(&self, id: &ObjectId) -> Result<Commit, StorageError> {
        let bytes = self.store.load(id)?;
        Commit::parse(id, &bytes)
    }

    /// Lazily walk from `start` back to the root commit.
    pub fn history(&self, start: &ObjectId) -> History<'a> {
        History {
            store: self.store,
            next: Some(start.clone()),
        }
    }
}

/// Iterator over a commit chain, newest first.
///
/// Yields `(id, commit)` pairs until a root commit has been yielded. A commit
/// that cannot be loaded or decoded is yielded as an error, after which the
/// iterator is exhausted.
pub struct History<'a> {
    store: &'a ObjectStore,
    next: Option<ObjectId>,
}

impl Iterator for History<'_> {
    type Item = Result<(ObjectId, Commit), StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let commit = match self.store.load(&id).and_then(|bytes| Commit::parse(&id, &bytes)) {
            Ok(commit) => commit,
            Err(e) => {
                debug!(commit = %id, error = %e, "History walk stopped");
                return Some(Err(e));
            }
        };
        self.next = commit.parent.clone();
        Some(Ok((id, commit)))
    }
}

impl std::iter::FusedIterator for History<'_> {}
