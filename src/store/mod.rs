//! Object Store
//!
//! Content-addressed storage for blobs, trees and commits. Objects are zlib
//! compressed and stored at `{root}/objects/{hex[0..2]}/{hex[2..]}`.
//!
//! Writes go to a fresh temporary file under `{root}/temp` and are renamed
//! into place, so an object's final path only ever holds a complete payload.
//! Every store rewrites the object even if it already exists; the content is
//! identical by construction.

pub mod hasher;

use crate::error::StorageError;
use crate::repository::Repository;
use crate::types::ObjectId;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use hasher::ContentHasher;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

/// Default zlib level used when no configuration overrides it.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

const CHUNK_SIZE: usize = 8 * 1024;

/// Content-addressed object store rooted in a repository's metadata directory.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    temp_dir: PathBuf,
    compression: Compression,
}

impl ObjectStore {
    pub fn new(repo: &Repository) -> Self {
        Self::with_compression(repo, DEFAULT_COMPRESSION_LEVEL)
    }

    /// Create a store writing objects at the given zlib level (0-9).
    pub fn with_compression(repo: &Repository, level: u32) -> Self {
        Self {
            objects_dir: repo.objects_dir(),
            temp_dir: repo.temp_dir(),
            compression: Compression::new(level.min(9)),
        }
    }

    /// Store an in-memory payload and return its content hash.
    pub fn store(&self, bytes: &[u8]) -> Result<ObjectId, StorageError> {
        self.store_stream(bytes, Path::new("<memory>"))
    }

    /// Store a file's content, hashing and compressing it chunk by chunk.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn store_file(&self, path: &Path) -> Result<ObjectId, StorageError> {
        let file = File::open(path).map_err(|e| StorageError::io("open", path, e))?;
        self.store_stream(BufReader::new(file), path)
    }

    fn store_stream<R: Read>(&self, mut reader: R, source: &Path) -> Result<ObjectId, StorageError> {
        fs::create_dir_all(&self.temp_dir)
            .map_err(|e| StorageError::io("create directory", &self.temp_dir, e))?;
        let temp = NamedTempFile::new_in(&self.temp_dir)
            .map_err(|e| StorageError::io("create temp file in", &self.temp_dir, e))?;
        let temp_path = temp.path().to_path_buf();

        let mut encoder = ZlibEncoder::new(temp, self.compression);
        let mut hasher = ContentHasher::new();
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(StorageError::io("read", source, e)),
            };
            hasher.update(&buffer[..read]);
            encoder
                .write_all(&buffer[..read])
                .map_err(|e| StorageError::io("write", &temp_path, e))?;
        }
        let temp = encoder
            .finish()
            .map_err(|e| StorageError::io("write", &temp_path, e))?;

        let id = hasher.finalize()?;
        let object_path = self.object_path(&id);
        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io("create directory", parent, e))?;
        }

        // Dropping the temp file on any earlier return removes it.
        temp.persist(&object_path)
            .map_err(|e| StorageError::io("rename temp file to", &object_path, e.error))?;

        trace!(object = %id, "Stored object");
        Ok(id)
    }

    /// Load and fully decompress an object.
    pub fn load(&self, id: &ObjectId) -> Result<Vec<u8>, StorageError> {
        let mut data = Vec::new();
        self.decode_into(id, &mut data, Path::new("<memory>"))?;
        Ok(data)
    }

    /// Create or truncate `dest` and stream the decompressed object into it.
    ///
    /// Returns the number of bytes written.
    pub fn write_to_file(&self, id: &ObjectId, dest: &Path) -> Result<u64, StorageError> {
        let file = File::create(dest).map_err(|e| StorageError::io("create", dest, e))?;
        let mut writer = BufWriter::new(file);
        let written = self.decode_into(id, &mut writer, dest)?;
        writer
            .flush()
            .map_err(|e| StorageError::io("write", dest, e))?;
        Ok(written)
    }

    fn decode_into<W: Write>(
        &self,
        id: &ObjectId,
        writer: &mut W,
        dest: &Path,
    ) -> Result<u64, StorageError> {
        let path = self.object_path(id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::ObjectNotFound(id.clone()))
            }
            Err(e) => return Err(StorageError::io("open", &path, e)),
        };

        let mut decoder = ZlibDecoder::new(BufReader::new(file));
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let read = match decoder.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(StorageError::corrupt(
                        id,
                        format!("failed to decompress object file: {}", e),
                    ))
                }
            };
            writer
                .write_all(&buffer[..read])
                .map_err(|e| StorageError::io("write", dest, e))?;
            total += read as u64;
        }
        Ok(total)
    }

    /// Decompress an arbitrary object file by path (diagnostic read).
    pub fn read_object_file(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let file = File::open(path).map_err(|e| StorageError::io("open", path, e))?;
        let mut data = Vec::new();
        ZlibDecoder::new(BufReader::new(file))
            .read_to_end(&mut data)
            .map_err(|e| {
                StorageError::corrupt(
                    path.display(),
                    format!("failed to decompress object file: {}", e),
                )
            })?;
        Ok(data)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Enumerate every object id present on disk, sorted.
    pub fn list(&self) -> Result<Vec<ObjectId>, StorageError> {
        let mut ids = Vec::new();
        if !self.objects_dir.exists() {
            return Ok(ids);
        }

        for entry in WalkDir::new(&self.objects_dir).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.objects_dir.clone());
                StorageError::io("walk", path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let prefix = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str());
            let rest = entry.file_name().to_str();
            match (prefix, rest) {
                (Some(prefix), Some(rest)) => match ObjectId::from_hex(&format!("{}{}", prefix, rest)) {
                    Ok(id) => ids.push(id),
                    Err(_) => debug!(path = %entry.path().display(), "Skipping non-object file"),
                },
                _ => debug!(path = %entry.path().display(), "Skipping non-UTF-8 object path"),
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Reload an object and check that its content still hashes to its address.
    pub fn verify(&self, id: &ObjectId) -> Result<(), StorageError> {
        let data = self.load(id)?;
        let actual = hasher::compute_hash(&data)?;
        if &actual != id {
            return Err(StorageError::HashMismatch {
                expected: id.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Path of an object: `objects/{hex[0..2]}/{hex[2..]}`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.fan_out();
        self.objects_dir.join(dir).join(file)
    }
}
