//! Repository context
//!
//! A `Repository` names a work tree and its metadata root. Every component is
//! constructed from one, so a process can operate on any number of
//! repositories side by side.

use crate::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Name of the metadata directory inside the work tree.
pub const METADATA_DIR: &str = ".gat";

/// Directory names never snapshotted and never pruned by checkout.
pub const RESERVED_NAMES: &[&str] = &[".git", METADATA_DIR];

/// Branch created by `init`.
pub const DEFAULT_BRANCH: &str = "main";

/// Relative prefix of branch ref files, as stored in HEAD.
pub const HEADS_PREFIX: &str = "refs/heads/";

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Explicit repository context: work tree plus on-disk layout.
#[derive(Debug, Clone)]
pub struct Repository {
    work_tree: PathBuf,
    root: PathBuf,
}

impl Repository {
    /// Create the metadata layout under `work_tree` if missing.
    ///
    /// Idempotent: an existing HEAD or branch ref is left untouched.
    #[instrument(skip_all, fields(work_tree = %work_tree.as_ref().display()))]
    pub fn init<P: AsRef<Path>>(work_tree: P) -> Result<Self, StorageError> {
        let repo = Self::at(work_tree.as_ref());

        for dir in [
            repo.root.clone(),
            repo.objects_dir(),
            repo.temp_dir(),
            repo.heads_dir(),
            repo.tags_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io("create directory", &dir, e))?;
        }

        let main_ref = repo.heads_dir().join(DEFAULT_BRANCH);
        if !main_ref.exists() {
            fs::write(&main_ref, b"").map_err(|e| StorageError::io("create ref", &main_ref, e))?;
            debug!(branch = DEFAULT_BRANCH, "Created default branch ref");
        }

        let head = repo.head_file();
        let head_is_empty = match fs::read(&head) {
            Ok(content) => content.iter().all(|b| b.is_ascii_whitespace()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(StorageError::io("read", &head, e)),
        };
        if head_is_empty {
            let target = format!("{}{}", HEADS_PREFIX, DEFAULT_BRANCH);
            fs::write(&head, target.as_bytes()).map_err(|e| StorageError::io("write", &head, e))?;
            info!(root = %repo.root.display(), "Initialized repository");
        }

        Ok(repo)
    }

    /// Open an existing repository; fails if the metadata root is absent.
    pub fn open<P: AsRef<Path>>(work_tree: P) -> Result<Self, StorageError> {
        let repo = Self::at(work_tree.as_ref());
        if !repo.root.is_dir() {
            return Err(StorageError::RepositoryNotFound(repo.root));
        }
        Ok(repo)
    }

    fn at(work_tree: &Path) -> Self {
        Self {
            work_tree: work_tree.to_path_buf(),
            root: work_tree.join(METADATA_DIR),
        }
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// Metadata root (`<work tree>/.gat`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.root.join("objects")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub fn heads_dir(&self) -> PathBuf {
        self.root.join("refs").join("heads")
    }

    pub fn tags_dir(&self) -> PathBuf {
        self.root.join("refs").join("tags")
    }

    pub fn head_file(&self) -> PathBuf {
        self.root.join("HEAD")
    }

    /// Workspace configuration file (`<work tree>/.gat/config.toml`).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}
