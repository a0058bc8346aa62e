//! Tree construction
//!
//! Builds content-addressed trees bottom-up: file blobs first, then
//! directory nodes linking to them by name.

use std::sync::Arc;

use crate::codec::{encode_and_hash, CodecError};
use crate::hash::sha256;
use crate::store::Store;
use crate::types::{DirEntry, Hash, Link, TreeNode};

/// Builder error type
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// TreeBuilder - stores blobs and directory nodes by content hash
pub struct TreeBuilder<S: Store + ?Sized> {
    store: Arc<S>,
}

impl<S: Store + ?Sized> TreeBuilder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Store raw file content, returning its content hash
    pub async fn put_blob(&self, data: &[u8]) -> Result<Hash, BuilderError> {
        let hash = sha256(data);
        self.store
            .put(hash, data.to_vec())
            .await
            .map_err(|e| BuilderError::Store(e.to_string()))?;
        Ok(hash)
    }

    /// Store a directory node linking the given entries
    ///
    /// Entries are sorted by name so equal directories always encode to the
    /// same bytes and therefore the same hash.
    pub async fn put_directory(&self, entries: Vec<DirEntry>) -> Result<Hash, BuilderError> {
        let mut links: Vec<Link> = entries
            .into_iter()
            .map(|e| Link {
                hash: e.hash,
                name: e.name,
                mode: e.mode,
                size: e.size,
            })
            .collect();
        links.sort_by(|a, b| a.name.cmp(&b.name));

        let total_size: u64 = links.iter().filter_map(|l| l.size).sum();
        let node = TreeNode::new(links).with_total_size(total_size);

        let (data, hash) = encode_and_hash(&node)?;
        self.store
            .put(hash, data)
            .await
            .map_err(|e| BuilderError::Store(e.to_string()))?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_tree_node;
    use crate::store::MemoryStore;
    use crate::types::EntryMode;

    fn make_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_put_blob_roundtrip() {
        let store = make_store();
        let builder = TreeBuilder::new(store.clone());

        let data = b"hello".to_vec();
        let hash = builder.put_blob(&data).await.unwrap();

        assert_eq!(store.get(&hash).await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn test_put_directory_sorts_entries() {
        let store = make_store();
        let builder = TreeBuilder::new(store.clone());

        let f = builder.put_blob(&[1u8]).await.unwrap();
        let dir = builder
            .put_directory(vec![
                DirEntry::new("zebra.txt", f, EntryMode::Regular).with_size(1),
                DirEntry::new("alpha.txt", f, EntryMode::Regular).with_size(1),
            ])
            .await
            .unwrap();

        let node = decode_tree_node(&store.get(&dir).await.unwrap().unwrap()).unwrap();
        assert_eq!(node.links[0].name, "alpha.txt");
        assert_eq!(node.links[1].name, "zebra.txt");
        assert_eq!(node.total_size, Some(2));
    }

    #[tokio::test]
    async fn test_put_directory_deterministic_hash() {
        let store = make_store();
        let builder = TreeBuilder::new(store.clone());

        let f = builder.put_blob(&[1u8]).await.unwrap();

        let d1 = builder
            .put_directory(vec![
                DirEntry::new("a", f, EntryMode::Regular).with_size(1),
                DirEntry::new("b", f, EntryMode::Regular).with_size(1),
            ])
            .await
            .unwrap();
        let d2 = builder
            .put_directory(vec![
                DirEntry::new("b", f, EntryMode::Regular).with_size(1),
                DirEntry::new("a", f, EntryMode::Regular).with_size(1),
            ])
            .await
            .unwrap();

        assert_eq!(d1, d2);
    }
}
