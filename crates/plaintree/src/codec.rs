//! MessagePack encoding/decoding for directory nodes
//!
//! File objects are stored raw (not wrapped). Directory nodes are
//! MessagePack-encoded with fixed struct field order and name-sorted links,
//! so identical directories always hash to the same address.
//!
//! Format uses short keys for compact encoding:
//! - t: type (1 = tree)
//! - l: links array
//! - h: hash (in link)
//! - n: name (in link)
//! - m: entry mode (in link)
//! - s: size (in link or total_size, optional)

use serde::{Deserialize, Serialize};

use crate::hash::sha256;
use crate::types::{EntryMode, Hash, Link, TreeNode};

/// Error type for codec operations
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid node type: {0}")]
    InvalidNodeType(u8),
    #[error("Invalid entry mode: {0}")]
    InvalidMode(u8),
    #[error("Invalid hash length: expected 32, got {0}")]
    InvalidHashLength(usize),
    #[error("MessagePack encoding error: {0}")]
    Encode(String),
    #[error("MessagePack decoding error: {0}")]
    Decode(String),
}

/// Wire format for a link (compact keys)
#[derive(Serialize, Deserialize)]
struct WireLink {
    /// Hash (required) - serde_bytes for proper MessagePack binary encoding
    #[serde(with = "serde_bytes")]
    h: Vec<u8>,
    /// Name
    n: String,
    /// Entry mode
    m: u8,
    /// Size (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<u64>,
}

/// Wire format for a tree node (compact keys)
#[derive(Serialize, Deserialize)]
struct WireTreeNode {
    /// Type (1 = tree)
    t: u8,
    /// Links
    l: Vec<WireLink>,
    /// Total size (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<u64>,
}

/// Encode a tree node to MessagePack
pub fn encode_tree_node(node: &TreeNode) -> Result<Vec<u8>, CodecError> {
    let wire = WireTreeNode {
        t: 1,
        l: node
            .links
            .iter()
            .map(|link| WireLink {
                h: link.hash.to_vec(),
                n: link.name.clone(),
                m: link.mode.as_u8(),
                s: link.size,
            })
            .collect(),
        s: node.total_size,
    };

    rmp_serde::to_vec_named(&wire).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode MessagePack to a tree node
pub fn decode_tree_node(data: &[u8]) -> Result<TreeNode, CodecError> {
    let wire: WireTreeNode =
        rmp_serde::from_slice(data).map_err(|e| CodecError::Decode(e.to_string()))?;

    if wire.t != 1 {
        return Err(CodecError::InvalidNodeType(wire.t));
    }

    let mut links = Vec::with_capacity(wire.l.len());
    for wl in wire.l {
        if wl.h.len() != 32 {
            return Err(CodecError::InvalidHashLength(wl.h.len()));
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&wl.h);

        let mode = EntryMode::from_u8(wl.m).ok_or(CodecError::InvalidMode(wl.m))?;

        links.push(Link {
            hash,
            name: wl.n,
            mode,
            size: wl.s,
        });
    }

    Ok(TreeNode {
        links,
        total_size: wire.s,
    })
}

/// Encode a tree node and compute its hash
pub fn encode_and_hash(node: &TreeNode) -> Result<(Vec<u8>, Hash), CodecError> {
    let data = encode_tree_node(node)?;
    let hash = sha256(&data);
    Ok((data, hash))
}
