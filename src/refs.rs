//! Branch References
//!
//! HEAD holds the relative path of the active branch's ref file
//! (`refs/heads/<name>`); each ref file holds a commit hash as text, or
//! nothing when the branch has no commits yet.

use crate::error::StorageError;
use crate::repository::{Repository, HEADS_PREFIX};
use crate::types::ObjectId;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Outcome of [`RefManager::create_branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCreation {
    /// Ref written from the current head and HEAD switched to it.
    Created,
    /// A ref with content already existed; nothing was changed.
    AlreadyExists,
}

/// A branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRef {
    pub name: String,
    pub head: Option<ObjectId>,
}

/// Reject names that are empty or would escape `refs/heads/`.
pub fn validate_branch_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && c != '/' && c != '\\');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidRefName(name.to_string()))
    }
}

/// Reads and writes HEAD and branch refs of one repository.
#[derive(Debug, Clone)]
pub struct RefManager {
    heads_dir: PathBuf,
    head_file: PathBuf,
    temp_dir: PathBuf,
}

impl RefManager {
    pub fn new(repo: &Repository) -> Self {
        Self {
            heads_dir: repo.heads_dir(),
            head_file: repo.head_file(),
            temp_dir: repo.temp_dir(),
        }
    }

    /// Name of the branch HEAD points at.
    pub fn current_branch(&self) -> Result<String, StorageError> {
        let target = self.head_target()?;
        match target.strip_prefix(HEADS_PREFIX) {
            Some(name) if validate_branch_name(name).is_ok() => Ok(name.to_string()),
            _ => Err(StorageError::RefResolution(format!(
                "HEAD points at {:?}, which is not a branch ref",
                target
            ))),
        }
    }

    /// Commit the current branch points at; `None` before the first commit.
    pub fn current_head(&self) -> Result<Option<ObjectId>, StorageError> {
        let branch = self.current_branch()?;
        self.read_ref(&self.ref_path(&branch))
    }

    /// Commit a named branch points at; fails if the branch does not exist.
    pub fn branch_head(&self, name: &str) -> Result<Option<ObjectId>, StorageError> {
        validate_branch_name(name)?;
        self.read_ref(&self.ref_path(name))
    }

    /// Point the active branch at a new commit.
    pub fn advance_current_branch(&self, commit: &ObjectId) -> Result<(), StorageError> {
        let branch = self.current_branch()?;
        self.write_atomic(&self.ref_path(&branch), commit.as_str())?;
        debug!(branch = %branch, commit = %commit, "Advanced branch");
        Ok(())
    }

    /// Create a branch at the current head and switch HEAD to it.
    ///
    /// An existing ref with content is left alone and reported as
    /// `AlreadyExists` rather than as an error.
    pub fn create_branch(&self, name: &str) -> Result<BranchCreation, StorageError> {
        validate_branch_name(name)?;
        let path = self.ref_path(name);

        match fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => {
                warn!(branch = %name, "Branch already exists");
                return Ok(BranchCreation::AlreadyExists);
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::io("read", &path, e)),
        }

        let head = self.current_head()?;
        let content = head.as_ref().map(ObjectId::as_str).unwrap_or("");
        self.write_atomic(&path, content)?;
        self.switch_head(name)?;

        info!(branch = %name, head = %content, "Created branch and switched to it");
        Ok(BranchCreation::Created)
    }

    /// Point HEAD at a branch. The branch is not required to exist.
    pub fn switch_head(&self, name: &str) -> Result<(), StorageError> {
        validate_branch_name(name)?;
        let target = format!("{}{}", HEADS_PREFIX, name);
        self.write_atomic(&self.head_file, &target)?;
        debug!(target = %target, "Switched HEAD");
        Ok(())
    }

    /// All branches, sorted by name.
    pub fn list_branches(&self) -> Result<Vec<BranchRef>, StorageError> {
        let listing = fs::read_dir(&self.heads_dir)
            .map_err(|e| StorageError::io("read directory", &self.heads_dir, e))?;

        let mut branches = Vec::new();
        for entry in listing {
            let entry =
                entry.map_err(|e| StorageError::io("read directory entry in", &self.heads_dir, e))?;
            let name = match entry.file_name().into_string() {
                Ok(name) if validate_branch_name(&name).is_ok() => name,
                _ => continue,
            };
            if !entry.path().is_file() {
                continue;
            }
            let head = self.read_ref(&entry.path())?;
            branches.push(BranchRef { name, head });
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    pub fn ref_path(&self, name: &str) -> PathBuf {
        self.heads_dir.join(name)
    }

    fn head_target(&self) -> Result<String, StorageError> {
        let content = match fs::read_to_string(&self.head_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::RefNotFound(self.head_file.clone()))
            }
            Err(e) => return Err(StorageError::io("read", &self.head_file, e)),
        };
        Ok(content.trim().to_string())
    }

    fn read_ref(&self, path: &Path) -> Result<Option<ObjectId>, StorageError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::RefNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(StorageError::io("read", path, e)),
        };

        let hash = content.trim();
        if hash.is_empty() {
            return Ok(None);
        }
        ObjectId::from_hex(hash).map(Some).map_err(|e| {
            StorageError::RefResolution(format!("ref {:?} does not hold a commit hash: {}", path, e))
        })
    }

    /// Write through a temp file and rename, so readers never see a torn ref.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.temp_dir)
            .map_err(|e| StorageError::io("create directory", &self.temp_dir, e))?;
        let mut temp = NamedTempFile::new_in(&self.temp_dir)
            .map_err(|e| StorageError::io("create temp file in", &self.temp_dir, e))?;
        temp.write_all(contents.as_bytes())
            .map_err(|e| StorageError::io("write", temp.path(), e))?;
        temp.persist(path)
            .map_err(|e| StorageError::io("rename temp file to", path, e.error))?;
        Ok(())
    }
}
