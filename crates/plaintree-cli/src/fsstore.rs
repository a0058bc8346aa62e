//! Filesystem-based content-addressed blob storage.
//!
//! Stores blobs in a directory structure similar to git:
//! `{base_path}/{first 2 chars of hash}/{remaining hash chars}`
//!
//! For example, a blob with hash `abcdef123...` is stored at
//! `{base_path}/ab/cdef123...`

use async_trait::async_trait;
use plaintree::store::{Store, StoreError};
use plaintree::types::{to_hex, Hash};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Filesystem-backed blob store implementing the plaintree Store trait.
///
/// Blobs are sharded 256 ways using the first 2 hex characters of the hash
/// as the directory prefix. Writes go through a temp file and rename so a
/// crashed write never leaves a truncated blob at its final address.
pub struct FsBlobStore {
    base_path: PathBuf,
}

impl FsBlobStore {
    /// Create a new filesystem blob store at the given path.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn blob_path(&self, hash: &Hash) -> PathBuf {
        let hex = to_hex(hash);
        self.base_path.join(&hex[..2]).join(&hex[2..])
    }
}

#[async_trait]
impl Store for FsBlobStore {
    async fn put(&self, hash: Hash, data: Vec<u8>) -> Result<bool, StoreError> {
        let path = self.blob_path(&hash);
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &path)?;
        Ok(true)
    }

    async fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.blob_path(hash)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn has(&self, hash: &Hash) -> Result<bool, StoreError> {
        Ok(self.blob_path(hash).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaintree::sha256;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path().join("objects")).unwrap();

        let data = b"some blob content".to_vec();
        let hash = sha256(&data);

        assert!(store.put(hash, data.clone()).await.unwrap());
        assert_eq!(store.get(&hash).await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path().join("objects")).unwrap();

        let data = vec![1u8, 2, 3];
        let hash = sha256(&data);

        assert!(store.put(hash, data.clone()).await.unwrap());
        assert!(!store.put(hash, data).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path().join("objects")).unwrap();

        assert_eq!(store.get(&[0u8; 32]).await.unwrap(), None);
        assert!(!store.has(&[0u8; 32]).await.unwrap());
    }

    #[tokio::test]
    async fn test_sharded_layout() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("objects");
        let store = FsBlobStore::new(&base).unwrap();

        let data = b"shard me".to_vec();
        let hash = sha256(&data);
        store.put(hash, data).await.unwrap();

        let hex = to_hex(&hash);
        assert!(base.join(&hex[..2]).join(&hex[2..]).exists());
    }
}
