//! Local filesystem blob store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::trace;

use crate::crypto::{BlobHash, StreamHash};
use crate::storage::{verify_blob, BlobStore, StorageError, StorageResult};

const BLOBS_DIR: &str = "blobs";
const STREAMS_DIR: &str = "streams";

/// Blobs and descriptors as files named by their lowercase hex hash.
/// Structure: `{root}/blobs/{blob_hash}` and `{root}/streams/{stream_hash}`.
///
/// Writes go to a temp file in the target directory and are renamed into
/// place, so a crash never leaves a truncated blob under a valid name.
#[derive(Debug, Clone)]
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(BLOBS_DIR))?;
        fs::create_dir_all(root.join(STREAMS_DIR))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, hash: &BlobHash) -> PathBuf {
        self.root.join(BLOBS_DIR).join(hash.to_hex())
    }

    fn descriptor_path(&self, hash: &StreamHash) -> PathBuf {
        self.root.join(STREAMS_DIR).join(hash.to_hex())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> StorageResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::Rejected(format!("path has no parent: {}", path.display())))?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

fn read_or_not_found(path: &Path, label: String) -> StorageResult<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound(label)),
        Err(e) => Err(e.into()),
    }
}

impl BlobStore for DiskBlobStore {
    fn put_blob(&self, blob_hash: &BlobHash, ciphertext: &[u8]) -> StorageResult<()> {
        verify_blob(blob_hash, ciphertext)?;
        let path = self.blob_path(blob_hash);
        if path.is_file() {
            trace!(%blob_hash, "blob already on disk");
            return Ok(());
        }
        write_atomic(&path, ciphertext)
    }

    fn has_blob(&self, blob_hash: &BlobHash) -> bool {
        self.blob_path(blob_hash).is_file()
    }

    fn put_descriptor(&self, stream_hash: &StreamHash, descriptor: &[u8]) -> StorageResult<()> {
        write_atomic(&self.descriptor_path(stream_hash), descriptor)
    }

    fn get_blob(&self, blob_hash: &BlobHash) -> StorageResult<Vec<u8>> {
        let data = read_or_not_found(&self.blob_path(blob_hash), blob_hash.to_hex())?;
        // Verify on read as well; the file may have been touched behind our back.
        verify_blob(blob_hash, &data)?;
        Ok(data)
    }

    fn get_descriptor(&self, stream_hash: &StreamHash) -> StorageResult<Vec<u8>> {
        read_or_not_found(&self.descriptor_path(stream_hash), stream_hash.to_hex())
    }
}
