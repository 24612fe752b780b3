//! Content hashing for stored objects using BLAKE3

use crate::error::StorageError;
use crate::types::ObjectId;
use blake3::Hasher;

/// Compute the object id of an in-memory payload.
pub fn compute_hash(data: &[u8]) -> Result<ObjectId, StorageError> {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Incremental hasher fed chunk by chunk while an object is streamed to disk.
pub struct ContentHasher {
    inner: Hasher,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self {
            inner: Hasher::new(),
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    /// Finish hashing; fails if the digest does not encode to the fixed id length.
    pub fn finalize(self) -> Result<ObjectId, StorageError> {
        ObjectId::from_digest(self.inner.finalize().as_bytes())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
