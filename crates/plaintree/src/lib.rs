//! plaintree - content-addressed tree model with single-pass path resolution
//!
//! Every object is stored by SHA256(content) -> content: file blobs raw,
//! directory nodes MessagePack-encoded. A request path like
//! `docs/readme.txt` is resolved against a tree root in one pre-order walk,
//! classifying each visited entry by depth against the target and pruning
//! every branch off the literal path.
//!
//! # Example
//!
//! ```rust
//! use plaintree::{
//!     DirEntry, EntryMode, MemoryStore, PathTarget, Resolved, TreeBuilder, resolve,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let builder = TreeBuilder::new(store.clone());
//!
//!     let file = builder.put_blob(b"hello").await?;
//!     let root = builder
//!         .put_directory(vec![
//!             DirEntry::new("hello.txt", file, EntryMode::Regular).with_size(5),
//!         ])
//!         .await?;
//!
//!     let target = PathTarget::parse("main/hello.txt").unwrap();
//!     match resolve(&store, &root, &target.target).await? {
//!         Resolved::File { hash, .. } => assert_eq!(hash, file),
//!         other => panic!("unexpected: {:?}", other),
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod codec;
pub mod hash;
pub mod resolve;
pub mod store;
pub mod types;
pub mod walk;

// Re-exports for convenience
pub use builder::{BuilderError, TreeBuilder};
pub use codec::{decode_tree_node, encode_and_hash, encode_tree_node, CodecError};
pub use hash::{sha256, verify};
pub use resolve::{resolve, ListingEntry, MatchState, Outcome, PathTarget, Resolved, Target};
pub use store::{MemoryStore, Store, StoreError};
pub use types::{from_hex, to_hex, DirEntry, EntryMode, Hash, Link, TreeNode};
pub use walk::{walk_tree, WalkAction, WalkEntry, WalkError};
