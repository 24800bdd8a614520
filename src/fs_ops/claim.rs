//! Per-run destination ledger.
//!
//! Two sets, both behind one lock:
//! - `claimed`: destination names already handed out this run. The resolver
//!   treats them as taken even before (or, in dry-run, without) any file
//!   landing there, so parallel movers and dry-run planning never pick the
//!   same name twice.
//! - `vacated`: paths this run has moved away or removed. Only consulted in
//!   dry-run, where nothing actually leaves the tree, to decide whether a
//!   directory would be empty.
//!
//! Holding the lock across resolve-and-claim makes the check-then-reserve
//! step atomic inside one process; it does not coordinate separate processes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::resolve::{occupied, resolve_with, Resolved, MAX_COLLISION_SUFFIX};
use super::walk::EntryKind;
use crate::errors::FlattenError;

#[derive(Debug, Default)]
struct Sets {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

#[derive(Debug)]
pub struct RunLedger {
    sets: Mutex<Sets>,
    /// In dry-run the filesystem is frozen, so vacated paths are free again.
    dry_run: bool,
}

impl RunLedger {
    pub fn new(dry_run: bool) -> Self {
        Self {
            sets: Mutex::new(Sets::default()),
            dry_run,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sets> {
        // A panic while holding the lock leaves the sets consistent (plain inserts).
        self.sets.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Resolve `desired` and reserve the result for the rest of the run.
    pub fn claim(&self, desired: &Path, kind: EntryKind) -> Result<Resolved, FlattenError> {
        let mut sets = self.lock();
        let dry_run = self.dry_run;
        let resolved = resolve_with(desired, kind, MAX_COLLISION_SUFFIX, |p| {
            if sets.claimed.contains(p) {
                return true;
            }
            if dry_run && sets.vacated.contains(p) {
                return false;
            }
            occupied(p)
        })?;
        sets.claimed.insert(resolved.path.clone());
        Ok(resolved)
    }

    /// Give back a claim whose move failed.
    pub fn release(&self, path: &Path) {
        self.lock().claimed.remove(path);
    }

    pub fn mark_vacated(&self, path: &Path) {
        self.lock().vacated.insert(path.to_path_buf());
    }

    pub fn is_vacated(&self, path: &Path) -> bool {
        self.lock().vacated.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn second_claim_for_same_name_gets_next_suffix() {
        let td = tempdir().unwrap();
        let ledger = RunLedger::new(true);
        let want = td.path().join("x.txt");
        assert_eq!(ledger.claim(&want, EntryKind::File).unwrap().path, want);
        let second = ledger.claim(&want, EntryKind::File).unwrap();
        assert_eq!(second.path, td.path().join("x_1.txt"));
        assert_eq!(second.suffix, Some(1));
    }

    #[test]
    fn release_frees_the_name() {
        let td = tempdir().unwrap();
        let ledger = RunLedger::new(false);
        let want = td.path().join("x.txt");
        ledger.claim(&want, EntryKind::File).unwrap();
        ledger.release(&want);
        assert_eq!(ledger.claim(&want, EntryKind::File).unwrap().path, want);
    }

    #[test]
    fn dry_run_treats_vacated_paths_as_free() {
        let td = tempdir().unwrap();
        let existing = td.path().join("a.txt");
        fs::write(&existing, b"x").unwrap();

        let dry = RunLedger::new(true);
        dry.mark_vacated(&existing);
        assert_eq!(dry.claim(&existing, EntryKind::File).unwrap().path, existing);

        let live = RunLedger::new(false);
        live.mark_vacated(&existing);
        assert_eq!(
            live.claim(&existing, EntryKind::File).unwrap().path,
            td.path().join("a_1.txt")
        );
    }

    #[test]
    fn concurrent_claims_are_unique() {
        let td = tempdir().unwrap();
        let ledger = Arc::new(RunLedger::new(true));
        let want = td.path().join("same.bin");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                let want = want.clone();
                std::thread::spawn(move || ledger.claim(&want, EntryKind::File).unwrap().path)
            })
            .collect();
        let got: HashSet<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(got.len(), 8);
    }
}
