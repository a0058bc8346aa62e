//! Push-based tree traversal
//!
//! The store only exposes fetch-by-hash, so traversal is a pre-order
//! depth-first walk that visits every entry of every node it descends into.
//! The visitor controls recursion: returning [`WalkAction::Recurse`] on a
//! directory entry expands it, anything else prunes that branch. The walker
//! itself does no path matching; callers decide per entry.

use std::sync::Arc;

use crate::codec::{decode_tree_node, CodecError};
use crate::store::Store;
use crate::types::{to_hex, EntryMode, Hash, TreeNode};

/// Visitor decision for a single walk entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Do not descend into this entry
    Skip,
    /// Descend into this entry (ignored for non-directories)
    Recurse,
}

/// One entry visited during a walk
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path relative to the walk root, e.g. "docs/readme.txt"
    pub path: String,
    /// Final path segment
    pub name: String,
    pub mode: EntryMode,
    pub hash: Hash,
    pub size: Option<u64>,
}

impl WalkEntry {
    /// Byte length of the parent prefix including its trailing '/'
    /// (0 for top-level entries). This is the entry's depth signal.
    pub fn base_len(&self) -> usize {
        self.path.len() - self.name.len()
    }
}

/// Walk error type
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Missing object: {0}")]
    MissingObject(String),
}

/// Fetch and decode a directory node; a missing object is fatal to the walk
pub(crate) async fn fetch_node<S: Store + ?Sized>(
    store: &Arc<S>,
    hash: &Hash,
) -> Result<TreeNode, WalkError> {
    let data = store
        .get(hash)
        .await
        .map_err(|e| WalkError::Store(e.to_string()))?
        .ok_or_else(|| WalkError::MissingObject(to_hex(hash)))?;
    Ok(decode_tree_node(&data)?)
}

/// Walk the tree rooted at `root` pre-order, depth-first
///
/// Every entry of every expanded node is passed to `visit` exactly once,
/// parent before children. Only directories for which the visitor returned
/// [`WalkAction::Recurse`] are expanded.
pub async fn walk_tree<S, F>(store: &Arc<S>, root: &Hash, visit: &mut F) -> Result<(), WalkError>
where
    S: Store + ?Sized,
    F: FnMut(&WalkEntry) -> WalkAction,
{
    let node = fetch_node(store, root).await?;
    walk_node(store, &node, "", visit).await
}

async fn walk_node<S, F>(
    store: &Arc<S>,
    node: &TreeNode,
    prefix: &str,
    visit: &mut F,
) -> Result<(), WalkError>
where
    S: Store + ?Sized,
    F: FnMut(&WalkEntry) -> WalkAction,
{
    for link in &node.links {
        let path = if prefix.is_empty() {
            link.name.clone()
        } else {
            format!("{}/{}", prefix, link.name)
        };

        let entry = WalkEntry {
            path,
            name: link.name.clone(),
            mode: link.mode,
            hash: link.hash,
            size: link.size,
        };

        if visit(&entry) == WalkAction::Recurse && link.mode.is_dir() {
            let child = fetch_node(store, &link.hash).await?;
            Box::pin(walk_node(store, &child, &entry.path, visit)).await?;
        }
    }

    Ok(())
}
