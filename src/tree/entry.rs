//! Tree objects: ordered directory listings encoded as tab-separated text.
//!
//! Each row is `kind \t hash \t name \n`. Rows keep the order in which they
//! were pushed, so the hash of a tree depends on entry order.

use crate::error::StorageError;
use crate::repository::is_reserved;
use crate::types::ObjectId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of object a tree row points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(EntryKind::Blob),
            "tree" => Ok(EntryKind::Tree),
            other => Err(format!("unknown entry kind {:?}", other)),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named child of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub id: ObjectId,
    pub name: String,
}

impl TreeEntry {
    pub fn blob(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Blob,
            id,
            name: name.into(),
        }
    }

    pub fn tree(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Tree,
            id,
            name: name.into(),
        }
    }
}

/// Check that a name can be encoded in a tree row and safely materialized.
/// Reserved metadata names are valid only for blobs.
pub fn validate_entry_name(name: &str, kind: EntryKind) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("{:?} is not a valid entry name", name));
    }
    if name.contains(['\t', '\n', '/', '\0']) {
        return Err(format!(
            "{:?} contains a tab, newline, slash or NUL character",
            name
        ));
    }
    if kind == EntryKind::Tree && is_reserved(name) {
        return Err(format!("{:?} is a reserved directory name", name));
    }
    Ok(())
}

/// Directory snapshot: an ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with this name and kind exists.
    pub fn contains(&self, name: &str, kind: EntryKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind && e.name == name)
    }

    /// Child trees, in entry order.
    pub fn subtrees(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::Tree)
    }

    /// Sort entries by name (byte order).
    pub fn sort_by_name(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Text encoding: one `kind\thash\tname\n` row per entry.
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = String::new();
        for entry in &self.entries {
            buffer.push_str(entry.kind.as_str());
            buffer.push('\t');
            buffer.push_str(entry.id.as_str());
            buffer.push('\t');
            buffer.push_str(&entry.name);
            buffer.push('\n');
        }
        buffer.into_bytes()
    }

    /// Decode a tree object loaded from the store under `id`.
    pub fn parse(id: &ObjectId, bytes: &[u8]) -> Result<Self, StorageError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::corrupt(id, format!("tree is not UTF-8: {}", e)))?;

        let mut tree = Tree::new();
        let body = match text.strip_suffix('\n') {
            Some(body) => body,
            None if text.is_empty() => return Ok(tree),
            None => return Err(StorageError::corrupt(id, "tree row is not newline-terminated")),
        };

        for (line_no, line) in body.split('\n').enumerate() {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(StorageError::corrupt(
                    id,
                    format!("row {} has {} fields, expected 3", line_no + 1, fields.len()),
                ));
            }
            let kind = fields[0]
                .parse::<EntryKind>()
                .map_err(|e| StorageError::corrupt(id, format!("row {}: {}", line_no + 1, e)))?;
            let child = ObjectId::from_hex(fields[1]).map_err(|e| {
                StorageError::corrupt(id, format!("row {}: {}", line_no + 1, e))
            })?;
            validate_entry_name(fields[2], kind)
                .map_err(|e| StorageError::corrupt(id, format!("row {}: {}", line_no + 1, e)))?;

            tree.push(TreeEntry {
                kind,
                id: child,
                name: fields[2].to_string(),
            });
        }

        Ok(tree)
    }
}
