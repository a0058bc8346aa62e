//! Named revisions
//!
//! Branches and tags are plain files under `refs/heads/` and `refs/tags/`
//! holding a hex root hash; `HEAD` is a symref line pointing at a branch.
//! A 64-char hex token resolves directly to a root hash without a ref.

use anyhow::{Context, Result};
use plaintree::{from_hex, to_hex, Hash};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_BRANCH: &str = "main";

pub struct RefStore {
    root: PathBuf,
}

impl RefStore {
    /// Open (or initialize) the ref store inside the data directory
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let root = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(root.join("refs").join("heads"))
            .context("Failed to create refs directory")?;
        fs::create_dir_all(root.join("refs").join("tags"))
            .context("Failed to create refs directory")?;

        let head = root.join("HEAD");
        if !head.exists() {
            fs::write(&head, format!("ref: refs/heads/{}\n", DEFAULT_BRANCH))
                .context("Failed to write HEAD")?;
        }

        Ok(Self { root })
    }

    pub fn set_branch(&self, name: &str, hash: &Hash) -> Result<()> {
        self.write_ref("heads", name, hash)
    }

    pub fn set_tag(&self, name: &str, hash: &Hash) -> Result<()> {
        self.write_ref("tags", name, hash)
    }

    fn write_ref(&self, kind: &str, name: &str, hash: &Hash) -> Result<()> {
        if name.is_empty() || name.contains('/') || name.contains("..") {
            anyhow::bail!("Invalid ref name: {}", name);
        }
        let path = self.root.join("refs").join(kind).join(name);
        fs::write(&path, format!("{}\n", to_hex(hash)))
            .with_context(|| format!("Failed to write ref {}", name))?;
        Ok(())
    }

    pub fn branches(&self) -> Result<Vec<(String, Hash)>> {
        self.list_refs("heads")
    }

    pub fn tags(&self) -> Result<Vec<(String, Hash)>> {
        self.list_refs("tags")
    }

    fn list_refs(&self, kind: &str) -> Result<Vec<(String, Hash)>> {
        let dir = self.root.join("refs").join(kind);
        let mut refs = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(hash) = self.read_ref_file(&entry.path())? {
                refs.push((name, hash));
            }
        }
        refs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(refs)
    }

    fn read_ref_file(&self, path: &Path) -> Result<Option<Hash>> {
        let content = fs::read_to_string(path)?;
        Ok(from_hex(content.trim()).ok())
    }

    /// Resolve a revision token to a root tree hash.
    ///
    /// Tries HEAD, branch name, tag name, then a literal 64-char hex hash.
    /// Returns None for an unknown token; the walk never starts in that case.
    pub fn resolve(&self, token: &str) -> Result<Option<Hash>> {
        if token == "HEAD" {
            let content = fs::read_to_string(self.root.join("HEAD"))
                .context("Failed to read HEAD")?;
            let target = content.trim();
            if let Some(branch) = target.strip_prefix("ref: refs/heads/") {
                return self.lookup("heads", branch);
            }
            return Ok(from_hex(target).ok());
        }

        if let Some(hash) = self.lookup("heads", token)? {
            return Ok(Some(hash));
        }
        if let Some(hash) = self.lookup("tags", token)? {
            return Ok(Some(hash));
        }

        Ok(from_hex(token).ok())
    }

    fn lookup(&self, kind: &str, name: &str) -> Result<Option<Hash>> {
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Ok(None);
        }
        let path = self.root.join("refs").join(kind).join(name);
        if !path.is_file() {
            return Ok(None);
        }
        self.read_ref_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_resolve_branch() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let refs = RefStore::open(temp_dir.path())?;

        let hash = [5u8; 32];
        refs.set_branch("main", &hash)?;

        assert_eq!(refs.resolve("main")?, Some(hash));
        assert_eq!(refs.resolve("HEAD")?, Some(hash));
        Ok(())
    }

    #[test]
    fn test_resolve_tag() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let refs = RefStore::open(temp_dir.path())?;

        let hash = [6u8; 32];
        refs.set_tag("v1.0", &hash)?;

        assert_eq!(refs.resolve("v1.0")?, Some(hash));
        Ok(())
    }

    #[test]
    fn test_resolve_hex_token() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let refs = RefStore::open(temp_dir.path())?;

        let hash = [7u8; 32];
        assert_eq!(refs.resolve(&to_hex(&hash))?, Some(hash));
        Ok(())
    }

    #[test]
    fn test_resolve_unknown_is_none() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let refs = RefStore::open(temp_dir.path())?;

        assert_eq!(refs.resolve("nope")?, None);
        assert_eq!(refs.resolve("HEAD")?, None); // main not written yet
        Ok(())
    }

    #[test]
    fn test_list_refs_sorted() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let refs = RefStore::open(temp_dir.path())?;

        refs.set_branch("zeta", &[1u8; 32])?;
        refs.set_branch("alpha", &[2u8; 32])?;

        let names: Vec<_> = refs.branches()?.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        Ok(())
    }

    #[test]
    fn test_invalid_ref_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let refs = RefStore::open(temp_dir.path()).unwrap();

        assert!(refs.set_branch("a/b", &[0u8; 32]).is_err());
        assert!(refs.set_branch("..", &[0u8; 32]).is_err());
    }
}
