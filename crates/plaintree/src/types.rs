//! Core tree types
//!
//! Every node is stored by SHA256(content) -> content. Directory nodes are
//! MessagePack-encoded lists of named links; file objects are raw blobs.

/// 32-byte SHA256 hash used as content address
pub type Hash = [u8; 32];

/// Convert hash to hex string
pub fn to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Convert hex string to hash
pub fn from_hex(hex_str: &str) -> Result<Hash, hex::FromHexError> {
    let bytes = hex::decode(hex_str)?;
    if bytes.len() != 32 {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

/// Kind of object a directory entry points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Regular file blob
    Regular,
    /// Regular file blob with the executable bit set
    Executable,
    /// Symbolic link (target path stored as the blob content)
    Symlink,
    /// Directory tree node
    Directory,
}

impl EntryMode {
    /// Regular file content that can be served as bytes
    pub fn is_file(self) -> bool {
        matches!(self, EntryMode::Regular | EntryMode::Executable)
    }

    pub fn is_dir(self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            EntryMode::Regular => 0,
            EntryMode::Executable => 1,
            EntryMode::Symlink => 2,
            EntryMode::Directory => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(EntryMode::Regular),
            1 => Some(EntryMode::Executable),
            2 => Some(EntryMode::Symlink),
            3 => Some(EntryMode::Directory),
            _ => None,
        }
    }
}

/// A named link from a directory node to a child object
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// SHA256 hash of the child object
    pub hash: Hash,
    /// Entry name within the directory
    pub name: String,
    /// What the link points to
    pub mode: EntryMode,
    /// Size of the child in bytes, when known
    pub size: Option<u64>,
}

impl Link {
    pub fn new(hash: Hash, name: impl Into<String>, mode: EntryMode) -> Self {
        Self {
            hash,
            name: name.into(),
            mode,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Directory tree node - contains named links to children
/// Stored as: SHA256(msgpack(TreeNode)) -> msgpack(TreeNode)
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Links to child objects, sorted by name
    pub links: Vec<Link>,
    /// Total size of all data in this subtree
    pub total_size: Option<u64>,
}

impl TreeNode {
    pub fn new(links: Vec<Link>) -> Self {
        Self {
            links,
            total_size: None,
        }
    }

    pub fn with_total_size(mut self, size: u64) -> Self {
        self.total_size = Some(size);
        self
    }
}

/// Directory entry for building directory trees
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub hash: Hash,
    pub mode: EntryMode,
    pub size: Option<u64>,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, hash: Hash, mode: EntryMode) -> Self {
        Self {
            name: name.into(),
            hash,
            mode,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_empty() {
        let hash = [0u8; 32];
        let hex = to_hex(&hash);
        assert_eq!(
            hex,
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_from_hex() {
        let hex = "00ff100000000000000000000000000000000000000000000000000000000000";
        let hash = from_hex(hex).unwrap();
        assert_eq!(hash[0], 0x00);
        assert_eq!(hash[1], 0xff);
        assert_eq!(hash[2], 0x10);
    }

    #[test]
    fn test_from_hex_wrong_length() {
        assert!(from_hex("00ff10").is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let mut original = [0u8; 32];
        original[0] = 0;
        original[1] = 1;
        original[2] = 127;
        original[3] = 128;
        original[4] = 255;

        let hex = to_hex(&original);
        let result = from_hex(&hex).unwrap();
        assert_eq!(result, original);
    }

    #[test]
    fn test_mode_classification() {
        assert!(EntryMode::Regular.is_file());
        assert!(EntryMode::Executable.is_file());
        assert!(!EntryMode::Symlink.is_file());
        assert!(!EntryMode::Directory.is_file());
        assert!(EntryMode::Directory.is_dir());
        assert!(!EntryMode::Regular.is_dir());
    }

    #[test]
    fn test_mode_u8_roundtrip() {
        for mode in [
            EntryMode::Regular,
            EntryMode::Executable,
            EntryMode::Symlink,
            EntryMode::Directory,
        ] {
            assert_eq!(EntryMode::from_u8(mode.as_u8()), Some(mode));
        }
        assert_eq!(EntryMode::from_u8(200), None);
    }
}
