//! Core identifiers shared across the object store, trees, commits and refs.

use crate::error::StorageError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded object hash (BLAKE3, 32 bytes).
pub const HASH_HEX_LEN: usize = 64;

/// Content hash addressing an object in the store.
///
/// Always lowercase hex of exactly [`HASH_HEX_LEN`] characters. The first two
/// characters name the fan-out directory under `objects/`, the rest the file.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse a hex hash supplied by a user, a tree row, a commit or a ref file.
    pub fn from_hex(value: &str) -> Result<Self, StorageError> {
        if value.len() != HASH_HEX_LEN {
            return Err(StorageError::InvalidHash {
                value: value.to_string(),
                reason: format!(
                    "expected {} hex characters, got {}",
                    HASH_HEX_LEN,
                    value.len()
                ),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StorageError::InvalidHash {
                value: value.to_string(),
                reason: "contains non-hex characters".to_string(),
            });
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Build an id from a freshly computed digest.
    ///
    /// Fails with `InvalidHash` if the encoded digest is not the fixed length.
    pub fn from_digest(digest: &[u8]) -> Result<Self, StorageError> {
        let encoded = hex::encode(digest);
        if encoded.len() != HASH_HEX_LEN {
            return Err(StorageError::InvalidHash {
                reason: format!(
                    "failed to hash content, expected hash length {} got {}",
                    HASH_HEX_LEN,
                    encoded.len()
                ),
                value: encoded,
            });
        }
        Ok(Self(encoded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(directory, file)` components of the object path.
    pub fn fan_out(&self) -> (&str, &str) {
        self.0.split_at(2)
    }

    /// Abbreviated form for human-readable output.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl FromStr for ObjectId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}
