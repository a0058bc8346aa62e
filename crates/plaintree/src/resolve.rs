//! Single-pass path resolution
//!
//! Resolves a request path against a tree root in one forward walk, with no
//! path index. The target's nesting depth is computed up front from the raw
//! path string; every visited entry is then classified against it:
//!
//! - at the target depth, the entry whose path equals the target is the
//!   match (file: serve bytes; directory: open a listing and recurse);
//! - below the target depth, entries belong to the matched directory's
//!   listing and are never expanded;
//! - above the target depth, only the single ancestor directory whose path
//!   is a prefix of the target is expanded, so no unrelated subtree is ever
//!   fetched and the walk stays proportional to the path plus the listing.

use std::sync::Arc;

use crate::store::Store;
use crate::types::{EntryMode, Hash};
use crate::walk::{fetch_node, walk_tree, WalkAction, WalkEntry, WalkError};

/// What the request path points at below the revision token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No sub-path at all: the revision's root tree itself
    Root,
    /// A sub-path within the tree
    Sub {
        /// Path below the revision root, no leading or trailing '/'
        path: String,
        /// Byte length of the prefix up to and including the last '/'
        /// (0 when the path is a single segment). Computed once, before
        /// any walk step; entries are classified against it by depth.
        base_len: usize,
    },
}

/// Parsed request path: revision token plus target below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTarget {
    pub revision: String,
    pub target: Target,
}

impl PathTarget {
    /// Parse a request path with leading/trailing slashes already trimmed.
    ///
    /// The first segment is the revision token; the rest is the sub-path.
    /// Returns None for an empty path (the ref-listing mode, handled
    /// entirely outside the walk).
    pub fn parse(raw: &str) -> Option<PathTarget> {
        if raw.is_empty() {
            return None;
        }

        match raw.split_once('/') {
            None => Some(PathTarget {
                revision: raw.to_string(),
                target: Target::Root,
            }),
            Some((revision, sub)) => {
                let sub = sub.trim_matches('/');
                let target = if sub.is_empty() {
                    Target::Root
                } else {
                    let base_len = sub.rfind('/').map(|i| i + 1).unwrap_or(0);
                    Target::Sub {
                        path: sub.to_string(),
                        base_len,
                    }
                };
                Some(PathTarget {
                    revision: revision.to_string(),
                    target,
                })
            }
        }
    }
}

/// Final classification of the target, set at most once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    None,
    File,
    Directory,
}

/// Match state for one request: has the target been found, and what is it.
/// Transitions None -> File or None -> Directory, never back.
#[derive(Debug, Default)]
pub struct MatchState {
    outcome: Outcome,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn mark_file(&mut self) {
        debug_assert_eq!(self.outcome, Outcome::None);
        self.outcome = Outcome::File;
    }

    pub fn mark_directory(&mut self) {
        debug_assert_eq!(self.outcome, Outcome::None);
        self.outcome = Outcome::Directory;
    }
}

/// One line of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub mode: EntryMode,
}

/// Result of resolving a target against a tree root
#[derive(Debug, Clone)]
pub enum Resolved {
    /// The target is a regular file; content is fetched by hash
    File {
        name: String,
        hash: Hash,
        size: Option<u64>,
    },
    /// The target is a directory with its immediate children,
    /// in walk-visitation order
    Directory {
        /// Target path below the revision root ("" for the root tree)
        path: String,
        hash: Hash,
        entries: Vec<ListingEntry>,
    },
    /// The walk completed without locating the target
    NotFound,
}

/// Resolve `target` against the tree rooted at `root` in a single walk.
///
/// A store failure or missing object along the path is fatal to the
/// request; there is no retry, the data for a given hash is immutable.
pub async fn resolve<S: Store + ?Sized>(
    store: &Arc<S>,
    root: &Hash,
    target: &Target,
) -> Result<Resolved, WalkError> {
    let (sub_path, base_len) = match target {
        Target::Root => {
            // The root tree is the target directory; list its immediate
            // children without entering the generic walk rules.
            let node = fetch_node(store, root).await?;
            let entries = node
                .links
                .iter()
                .map(|l| ListingEntry {
                    name: l.name.clone(),
                    mode: l.mode,
                })
                .collect();
            return Ok(Resolved::Directory {
                path: String::new(),
                hash: *root,
                entries,
            });
        }
        Target::Sub { path, base_len } => (path.as_str(), *base_len),
    };

    let mut state = MatchState::new();
    let mut file: Option<(String, Hash, Option<u64>)> = None;
    let mut dir_hash: Option<Hash> = None;
    let mut listing: Vec<ListingEntry> = Vec::new();

    walk_tree(store, root, &mut |entry: &WalkEntry| {
        let parent_len = entry.base_len();

        if parent_len == base_len {
            // Entry sits at the directory level containing the target's
            // final segment; only the exact path is the target.
            if entry.path != sub_path {
                return WalkAction::Skip;
            }
            if entry.mode.is_dir() {
                state.mark_directory();
                dir_hash = Some(entry.hash);
                return WalkAction::Recurse;
            }
            if entry.mode.is_file() && state.outcome() == Outcome::None {
                state.mark_file();
                file = Some((entry.name.clone(), entry.hash, entry.size));
            }
            WalkAction::Skip
        } else if parent_len > base_len {
            // Strictly inside the matched directory: the parent was
            // classified first (pre-order), and nothing else is ever
            // recursed into. One listing line, no expansion.
            listing.push(ListingEntry {
                name: entry.name.clone(),
                mode: entry.mode,
            });
            WalkAction::Skip
        } else {
            // Ancestor level: descend only along the literal target path.
            if entry.mode.is_dir()
                && sub_path.len() > entry.path.len()
                && sub_path.as_bytes()[entry.path.len()] == b'/'
                && sub_path.starts_with(entry.path.as_str())
            {
                WalkAction::Recurse
            } else {
                WalkAction::Skip
            }
        }
    })
    .await?;

    match (state.outcome(), file, dir_hash) {
        (Outcome::File, Some((name, hash, size)), _) => Ok(Resolved::File { name, hash, size }),
        (Outcome::Directory, _, Some(hash)) => Ok(Resolved::Directory {
            path: sub_path.to_string(),
            hash,
            entries: listing,
        }),
        _ => Ok(Resolved::NotFound),
    }
}
