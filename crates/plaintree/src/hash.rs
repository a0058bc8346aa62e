//! Hashing utilities using SHA256

use crate::types::Hash;
use sha2::{Digest, Sha256};

/// Compute SHA256 hash of data
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Verify that data matches expected hash
pub fn verify(hash: &Hash, data: &[u8]) -> bool {
    let computed = sha256(data);
    computed == *hash
}
