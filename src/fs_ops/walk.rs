//! Lazy tree traversal for flattening.
//!
//! Built on walkdir in contents-first order: a directory is yielded only after
//! everything beneath it, so the orchestrator can prune bottom-up as it goes.
//! Siblings are sorted by file name for reproducible runs.
//!
//! What gets yielded (depth is relative to the root, which is never yielded):
//! - OneLevel: files at depth 2, and each depth-1 directory after its files.
//!   Deeper directories are neither descended into nor yielded.
//! - FullDepth: files at depth >= 2, and every directory after its subtree.
//! - Files at depth 1 already live in the root and are skipped in both modes.
//!
//! Symlinks are never followed; a symlink (even to a directory) is a File.
//! The walk reads the filesystem live and cannot be restarted; entries that
//! vanish or cannot be listed come through as errors and the walk continues.
//! A directory whose listing failed is reported once, as that error, and is
//! not yielded again afterwards.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::FlattenMode;
use crate::errors::FlattenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One discovered entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// 1 for direct children of the root.
    pub depth: usize,
}

/// Iterator returned by [`walk`].
pub struct TreeWalker {
    inner: walkdir::IntoIter,
    mode: FlattenMode,
    /// Paths walkdir already reported an error for.
    failed: HashSet<PathBuf>,
}

/// Start a walk of `root` for `mode`. Nothing is read until the first `next()`.
pub fn walk(root: &Path, mode: FlattenMode) -> TreeWalker {
    let max_depth = match mode {
        FlattenMode::OneLevel => 2,
        FlattenMode::FullDepth => usize::MAX,
    };
    let inner = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .contents_first(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter();
    TreeWalker {
        inner,
        mode,
        failed: HashSet::new(),
    }
}

impl TreeWalker {
    fn wanted(&self, kind: EntryKind, depth: usize) -> bool {
        match (self.mode, kind) {
            (_, EntryKind::File) => depth >= 2,
            (FlattenMode::OneLevel, EntryKind::Directory) => depth == 1,
            (FlattenMode::FullDepth, EntryKind::Directory) => depth >= 1,
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Result<DirectoryEntry, FlattenError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(e) => {
                    if let Some(p) = e.path() {
                        self.failed.insert(p.to_path_buf());
                    }
                    return Some(Err(walk_error(e)));
                }
            };
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let depth = entry.depth();
            // contents_first still hands back a directory it could not list.
            if kind == EntryKind::Directory && self.failed.remove(entry.path()) {
                continue;
            }
            if self.wanted(kind, depth) {
                return Some(Ok(DirectoryEntry {
                    path: entry.into_path(),
                    kind,
                    depth,
                }));
            }
        }
    }
}

fn walk_error(e: walkdir::Error) -> FlattenError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
    if let Some(ancestor) = e.loop_ancestor() {
        return FlattenError::Io {
            message: format!(
                "filesystem loop at '{}' (points back to '{}')",
                path.display(),
                ancestor.display()
            ),
            path,
        };
    }
    let message = format!("walk '{}': {}", path.display(), e);
    match e.into_io_error() {
        Some(io) => FlattenError::from_io(&path, &io, message),
        None => FlattenError::from_io(&path, &io::Error::other(message.clone()), message),
    }
}
