//! Repository API
//!
//! Command-level operations over one repository. Each call wires the object
//! store, snapshot builder, commit graph, refs and checkout engine together
//! the way a single CLI command needs them.

use crate::checkout::{CheckoutEngine, CheckoutSummary};
use crate::commit::{Commit, CommitGraph};
use crate::config::GatConfig;
use crate::error::{ApiError, StorageError};
use crate::refs::{BranchCreation, BranchRef, RefManager};
use crate::repository::Repository;
use crate::store::ObjectStore;
use crate::tree::SnapshotBuilder;
use crate::types::ObjectId;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    pub branch: String,
    pub commit: ObjectId,
    pub tree: ObjectId,
    pub parent: Option<ObjectId>,
}

/// Result of a branch switch or revert.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
    pub branch: String,
    pub commit: ObjectId,
    pub summary: CheckoutSummary,
}

/// One history entry, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: ObjectId,
    #[serde(flatten)]
    pub commit: Commit,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub work_tree: PathBuf,
    pub branch: String,
    pub head: Option<ObjectId>,
    pub branches: Vec<BranchRef>,
    pub object_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyFailure {
    pub id: ObjectId,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub checked: usize,
    pub failures: Vec<VerifyFailure>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What `cat_object` should read.
#[derive(Debug, Clone)]
pub enum ObjectTarget {
    /// An object addressed by its hash.
    Id(String),
    /// An arbitrary compressed object file.
    Path(PathBuf),
}

pub struct RepositoryApi {
    repo: Repository,
    config: GatConfig,
    store: ObjectStore,
    refs: RefManager,
}

impl RepositoryApi {
    /// Create the repository layout if needed and open it.
    pub fn init(work_tree: &Path, config: GatConfig) -> Result<Self, ApiError> {
        let repo = Repository::init(work_tree)?;
        Ok(Self::with_repository(repo, config))
    }

    /// Open an existing repository.
    pub fn open(work_tree: &Path, config: GatConfig) -> Result<Self, ApiError> {
        let repo = Repository::open(work_tree)?;
        Ok(Self::with_repository(repo, config))
    }

    pub fn with_repository(repo: Repository, config: GatConfig) -> Self {
        let store = ObjectStore::with_compression(&repo, config.store.compression_level);
        let refs = RefManager::new(&repo);
        Self {
            repo,
            config,
            store,
            refs,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn refs(&self) -> &RefManager {
        &self.refs
    }

    /// Snapshot the whole work tree and commit it on the active branch.
    pub fn commit(&self, message: &str) -> Result<CommitOutcome, ApiError> {
        let branch = self.refs.current_branch()?;
        let parent = self.refs.current_head()?;

        let tree = SnapshotBuilder::new(&self.store)
            .with_order(self.config.snapshot.entry_order)
            .build(self.repo.work_tree())?;
        let commit = self.graph().create_commit(&tree, parent.as_ref(), message)?;

        Ok(CommitOutcome {
            branch,
            commit,
            tree,
            parent,
        })
    }

    pub fn create_branch(&self, name: &str) -> Result<BranchCreation, ApiError> {
        Ok(self.refs.create_branch(name)?)
    }

    pub fn checkout(&self, name: &str) -> Result<CheckoutOutcome, ApiError> {
        let (commit, summary) = self.engine().switch_branch(name)?;
        Ok(CheckoutOutcome {
            branch: name.to_string(),
            commit,
            summary,
        })
    }

    /// Restore the work tree to a commit given as a hex hash.
    pub fn revert(&self, hash: &str) -> Result<CheckoutOutcome, ApiError> {
        let commit = parse_hash(hash)?;
        let summary = self.engine().revert_to_commit(&commit)?;
        Ok(CheckoutOutcome {
            branch: self.refs.current_branch()?,
            commit,
            summary,
        })
    }

    /// History of the active branch, newest first, at most `limit` entries.
    pub fn log(&self, limit: Option<usize>) -> Result<Vec<LogEntry>, ApiError> {
        let Some(head) = self.refs.current_head()? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for item in self.graph().history(&head).take(limit.unwrap_or(usize::MAX)) {
            let (id, commit) = item?;
            entries.push(LogEntry { id, commit });
        }
        Ok(entries)
    }

    pub fn status(&self) -> Result<StatusReport, ApiError> {
        Ok(StatusReport {
            work_tree: self.repo.work_tree().to_path_buf(),
            branch: self.refs.current_branch()?,
            head: self.refs.current_head()?,
            branches: self.refs.list_branches()?,
            object_count: self.store.list()?.len(),
        })
    }

    /// Decompressed content of an object.
    pub fn cat_object(&self, target: &ObjectTarget) -> Result<Vec<u8>, ApiError> {
        let bytes = match target {
            ObjectTarget::Id(hash) => self.store.load(&parse_hash(hash)?)?,
            ObjectTarget::Path(path) => self.store.read_object_file(path)?,
        };
        Ok(bytes)
    }

    /// Rehash every stored object, collecting the ones that fail.
    pub fn verify(&self) -> Result<VerifyReport, ApiError> {
        let mut report = VerifyReport::default();
        for id in self.store.list()? {
            report.checked += 1;
            match self.store.verify(&id) {
                Ok(()) => {}
                Err(e @ (StorageError::HashMismatch { .. } | StorageError::CorruptObject { .. })) => {
                    warn!(object = %id, error = %e, "Object failed verification");
                    report.failures.push(VerifyFailure {
                        id,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
        info!(
            checked = report.checked,
            failures = report.failures.len(),
            "Verified object store"
        );
        Ok(report)
    }

    fn graph(&self) -> CommitGraph<'_> {
        CommitGraph::new(&self.store, &self.refs)
    }

    fn engine(&self) -> CheckoutEngine<'_> {
        CheckoutEngine::new(&self.repo, &self.store, &self.refs)
    }
}

fn parse_hash(hash: &str) -> Result<ObjectId, ApiError> {
    ObjectId::from_hex(hash.trim()).map_err(|e| ApiError::InvalidArgument(e.to_string()))
}
