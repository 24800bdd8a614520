//! Empty-directory removal.
//! Emptiness is re-read at the moment of the decision; nothing is assumed
//! from what the walk saw earlier. The run root is never removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::claim::RunLedger;
use super::helpers::{build_message, io_error_with_help};
use crate::errors::FlattenError;

pub struct EmptyDirPruner<'a> {
    root: PathBuf,
    ledger: &'a RunLedger,
    dry_run: bool,
}

impl<'a> EmptyDirPruner<'a> {
    /// `root` should be the canonical root the walk started from.
    pub fn new(root: &Path, ledger: &'a RunLedger, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            ledger,
            dry_run,
        }
    }

    fn is_root(&self, dir: &Path) -> bool {
        if dir == self.root {
            return true;
        }
        dunce::canonicalize(dir)
            .map(|c| c == self.root)
            .unwrap_or(false)
    }

    /// Remove `dir` if it is empty right now. `Ok(false)` means it still holds
    /// something (or is the root) and was left in place.
    pub fn prune_if_empty(&self, dir: &Path) -> Result<bool, FlattenError> {
        if self.is_root(dir) {
            debug!(dir = %dir.display(), "never pruning the root");
            return Ok(false);
        }

        let mut listing = fs::read_dir(dir).map_err(io_error_with_help("list directory", dir))?;
        let empty = if self.dry_run {
            // Nothing really left; count what this run planned to take away.
            listing.all(|e| e.map(|e| self.ledger.is_vacated(&e.path())).unwrap_or(false))
        } else {
            listing.next().is_none()
        };
        if !empty {
            debug!(dir = %dir.display(), "directory not empty; keeping it");
            return Ok(false);
        }

        if self.dry_run {
            self.ledger.mark_vacated(dir);
            debug!(dir = %dir.display(), "dry-run: would remove empty directory");
            return Ok(true);
        }

        fs::remove_dir(dir).map_err(|e| match e.kind() {
            io::ErrorKind::DirectoryNotEmpty => FlattenError::NotEmpty(dir.to_path_buf()),
            _ => FlattenError::from_io(dir, &e, build_message("remove directory", dir, &e)),
        })?;
        info!(dir = %dir.display(), "Removed empty directory");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn canonical_root() -> (tempfile::TempDir, PathBuf) {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        (td, root)
    }

    #[test]
    fn removes_empty_directory() {
        let (_td, root) = canonical_root();
        let sub = root.join("sub");
        fs::create_dir(&sub).unwrap();
        let ledger = RunLedger::new(false);
        assert!(EmptyDirPruner::new(&root, &ledger, false).prune_if_empty(&sub).unwrap());
        assert!(!sub.exists());
    }

    #[test]
    fn keeps_non_empty_directory() {
        let (_td, root) = canonical_root();
        let sub = root.join("sub");
        fs::create_dir_all(sub.join("nested")).unwrap();
        let ledger = RunLedger::new(false);
        assert!(!EmptyDirPruner::new(&root, &ledger, false).prune_if_empty(&sub).unwrap());
        assert!(sub.join("nested").exists());
    }

    #[test]
    fn never_removes_root_even_when_empty() {
        let (_td, root) = canonical_root();
        fs::create_dir(root.join("x")).unwrap();
        let ledger = RunLedger::new(false);
        let pruner = EmptyDirPruner::new(&root, &ledger, false);
        assert!(!pruner.prune_if_empty(&root).unwrap());
        assert!(!pruner.prune_if_empty(&root.join("x").join("..")).unwrap());
        assert!(root.exists());
    }

    #[test]
    fn dry_run_counts_vacated_entries_as_gone() {
        let (_td, root) = canonical_root();
        let sub = root.join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("a.txt"), b"x").unwrap();
        let ledger = RunLedger::new(true);
        let pruner = EmptyDirPruner::new(&root, &ledger, true);

        assert!(!pruner.prune_if_empty(&sub).unwrap());
        ledger.mark_vacated(&sub.join("a.txt"));
        assert!(pruner.prune_if_empty(&sub).unwrap());
        assert!(sub.join("a.txt").exists(), "dry-run must not delete");
        assert!(ledger.is_vacated(&sub));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let (_td, root) = canonical_root();
        let ledger = RunLedger::new(false);
        let err = EmptyDirPruner::new(&root, &ledger, false)
            .prune_if_empty(&root.join("gone"))
            .unwrap_err();
        assert!(matches!(err, FlattenError::Vanished(_)));
    }
}
