//! Commit records
//!
//! A commit links a root tree to its single optional parent, a message and a
//! timestamp. Commits are stored as objects in a small versioned text format:
//!
//! ```text
//! gat-commit 1
//! tree <hash>
//! parent <hash>        (bare `parent` for a root commit)
//! timestamp <seconds>
//! message <byte length>
//! <message bytes>
//! ```

pub mod graph;

pub use graph::{CommitGraph, History};

use crate::error::StorageError;
use crate::types::ObjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Header line identifying the encoding and its version.
pub const COMMIT_HEADER: &str = "gat-commit 1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub tree: ObjectId,
    pub parent: Option<ObjectId>,
    pub message: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl Commit {
    pub fn new(
        tree: ObjectId,
        parent: Option<ObjectId>,
        message: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            tree,
            parent,
            message: message.into(),
            timestamp,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Commit time as a UTC datetime, if the timestamp is representable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::with_capacity(160 + self.message.len());
        out.push_str(COMMIT_HEADER);
        out.push('\n');
        out.push_str("tree ");
        out.push_str(self.tree.as_str());
        out.push('\n');
        out.push_str("parent");
        if let Some(parent) = &self.parent {
            out.push(' ');
            out.push_str(parent.as_str());
        }
        out.push('\n');
        out.push_str(&format!("timestamp {}\n", self.timestamp));
        out.push_str(&format!("message {}\n", self.message.len()));
        out.push_str(&self.message);
        out.into_bytes()
    }

    /// Decode a commit object loaded from the store under `id`.
    pub fn parse(id: &ObjectId, bytes: &[u8]) -> Result<Self, StorageError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::corrupt(id, format!("commit is not UTF-8: {}", e)))?;
        let mut fields = HeaderFields { id, rest: text };

        let header = fields.next_line()?;
        if header != COMMIT_HEADER {
            return Err(StorageError::corrupt(
                id,
                format!("unsupported commit header {:?}", header),
            ));
        }

        let tree = fields.field("tree")?;
        let tree = ObjectId::from_hex(tree)
            .map_err(|e| StorageError::corrupt(id, format!("tree: {}", e)))?;

        let parent_line = fields.next_line()?;
        let parent = match parent_line {
            "parent" => None,
            line => match line.strip_prefix("parent ") {
                Some(hex) => Some(
                    ObjectId::from_hex(hex)
                        .map_err(|e| StorageError::corrupt(id, format!("parent: {}", e)))?,
                ),
                None => {
                    return Err(StorageError::corrupt(
                        id,
                        format!("expected parent field, found {:?}", line),
                    ))
                }
            },
        };

        let timestamp = fields
            .field("timestamp")?
            .parse::<i64>()
            .map_err(|e| StorageError::corrupt(id, format!("timestamp: {}", e)))?;

        let length = fields
            .field("message")?
            .parse::<usize>()
            .map_err(|e| StorageError::corrupt(id, format!("message length: {}", e)))?;

        let message = fields.rest;
        if message.len() != length {
            return Err(StorageError::corrupt(
                id,
                format!(
                    "message is {} bytes, header declares {}",
                    message.len(),
                    length
                ),
            ));
        }

        Ok(Commit {
            tree,
            parent,
            message: message.to_string(),
            timestamp,
        })
    }
}

/// Cursor over the newline-terminated header lines of a commit.
struct HeaderFields<'a> {
    id: &'a ObjectId,
    rest: &'a str,
}

impl<'a> HeaderFields<'a> {
    fn next_line(&mut self) -> Result<&'a str, StorageError> {
        let (line, rest) = self
            .rest
            .split_once('\n')
            .ok_or_else(|| StorageError::corrupt(self.id, "truncated commit header"))?;
        self.rest = rest;
        Ok(line)
    }

    /// Next line, which must be `<key> <value>`; returns the value.
    fn field(&mut self, key: &str) -> Result<&'a str, StorageError> {
        let line = self.next_line()?;
        line.strip_prefix(key)
            .and_then(|value| value.strip_prefix(' '))
            .ok_or_else(|| {
                StorageError::corrupt(self.id, format!("expected {} field, found {:?}", key, line))
            })
    }
}
