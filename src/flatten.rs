//! Flatten orchestrator.
//!
//! Drives one run: validate the root, walk it lazily, relocate each file into
//! the root, and prune each directory as the walk reports it (directories
//! arrive after their whole subtree, so pruning is bottom-up).
//!
//! Phases: Idle -> Walking -> Relocating <-> Pruning -> Done. A failing entry
//! is recorded in the summary and the run stays in its current phase; only an
//! invalid root aborts, and it does so before any walking.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::config::{validate_root, Config, FlattenMode};
use crate::errors::FlattenError;
use crate::fs_ops::{walk, DirectoryEntry, EmptyDirPruner, EntryKind, Relocator, RunLedger};
use crate::shutdown;
use crate::summary::{MoveResult, RunSummary};

/// Immutable input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenRequest {
    pub root: PathBuf,
    pub mode: FlattenMode,
    /// Plan only; the filesystem is not modified.
    pub dry_run: bool,
    /// Relocate each batch of sibling files on the rayon pool. Ignored in dry-run,
    /// whose plan must stay reproducible.
    pub parallel: bool,
}

impl FlattenRequest {
    pub fn new(root: impl Into<PathBuf>, mode: FlattenMode) -> Self {
        Self {
            root: root.into(),
            mode,
            dry_run: false,
            parallel: false,
        }
    }

    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }
}

impl From<&Config> for FlattenRequest {
    fn from(cfg: &Config) -> Self {
        FlattenRequest::new(cfg.root.clone(), cfg.mode)
            .dry_run(cfg.dry_run)
            .parallel(cfg.parallel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Walking,
    Relocating,
    Pruning,
    Done,
}

struct FlattenRun<'a> {
    root: &'a Path,
    relocator: Relocator<'a>,
    pruner: EmptyDirPruner<'a>,
    summary: RunSummary,
    phase: RunPhase,
    parallel: bool,
    /// Files waiting for a parallel flush; always drained before a prune.
    pending: Vec<DirectoryEntry>,
}

impl FlattenRun<'_> {
    fn enter(&mut self, next: RunPhase) {
        if self.phase != next {
            trace!(from = ?self.phase, to = ?next, "phase");
            self.phase = next;
        }
    }

    fn on_file(&mut self, entry: DirectoryEntry) {
        trace!(path = %entry.path.display(), depth = entry.depth, "file");
        if self.parallel {
            self.pending.push(entry);
            return;
        }
        self.enter(RunPhase::Relocating);
        let result = self.relocator.relocate(&entry, self.root);
        self.record(&entry.path, result);
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.enter(RunPhase::Relocating);
        let batch = std::mem::take(&mut self.pending);
        debug!(files = batch.len(), "relocating batch in parallel");
        let relocator = &self.relocator;
        let root = self.root;
        let results: Vec<Result<MoveResult, FlattenError>> = batch
            .par_iter()
            .map(|entry| {
                shutdown::check()?;
                relocator.relocate(entry, root)
            })
            .collect();
        for (entry, result) in batch.iter().zip(results) {
            self.record(&entry.path, result);
        }
    }

    fn record(&mut self, path: &Path, result: Result<MoveResult, FlattenError>) {
        match result {
            Ok(m) => self.summary.record_move(m),
            Err(FlattenError::Interrupted) => self.summary.interrupted = true,
            Err(e) => {
                warn!(path = %path.display(), code = e.code(), kind = e.kind(), error = %e, "relocation failed");
                self.summary.record_error(path, &e);
            }
        }
    }

    fn on_directory(&mut self, entry: &DirectoryEntry) {
        let dir = entry.path.as_path();
        self.flush();
        self.enter(RunPhase::Pruning);
        trace!(dir = %dir.display(), depth = entry.depth, "directory complete");
        match self.pruner.prune_if_empty(dir) {
            Ok(true) => self.summary.record_prune(dir.to_path_buf()),
            Ok(false) => {}
            Err(e) => {
                warn!(dir = %dir.display(), code = e.code(), kind = e.kind(), error = %e, "prune failed");
                self.summary.record_error(dir, &e);
            }
        }
    }
}

/// Flatten `request.root` and report what happened.
///
/// Errors only for an invalid root (missing, not a directory, unreadable);
/// everything that goes wrong per entry ends up in `RunSummary::errors`.
pub fn run(request: &FlattenRequest) -> Result<RunSummary, FlattenError> {
    let root = validate_root(&request.root)?;
    let ledger = RunLedger::new(request.dry_run);
    let mut state = FlattenRun {
        root: &root,
        relocator: Relocator::new(&ledger, request.dry_run),
        pruner: EmptyDirPruner::new(&root, &ledger, request.dry_run),
        summary: RunSummary::new(root.clone(), request.mode, request.dry_run),
        phase: RunPhase::Idle,
        parallel: request.parallel && !request.dry_run,
        pending: Vec::new(),
    };

    info!(root = %root.display(), mode = %request.mode, dry_run = request.dry_run, "Starting flatten");
    state.enter(RunPhase::Walking);
    for item in walk(&root, request.mode) {
        if shutdown::is_requested() {
            state.summary.interrupted = true;
            break;
        }
        match item {
            Ok(entry) => match entry.kind {
                EntryKind::File => state.on_file(entry),
                EntryKind::Directory => state.on_directory(&entry),
            },
            Err(e) => {
                let path = e
                    .path()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                warn!(path = %path.display(), error = %e, "walk error; continuing");
                state.summary.record_error(&path, &e);
            }
        }
    }
    if state.summary.interrupted {
        // Unflushed files stay where they are; the tree is still consistent.
        warn!(skipped = state.pending.len(), "interrupted; stopping before remaining entries");
        state.pending.clear();
    } else {
        state.flush();
    }
    state.enter(RunPhase::Done);

    let summary = state.summary;
    info!(
        moved = summary.moved_count,
        pruned = summary.pruned_directory_count,
        errors = summary.errors.len(),
        interrupted = summary.interrupted,
        "Flatten finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_config_carries_run_flags() {
        let mut cfg = Config::new("/data/inbox", FlattenMode::FullDepth);
        cfg.dry_run = true;
        cfg.parallel = true;
        cfg.json = true;
        let req = FlattenRequest::from(&cfg);
        assert_eq!(
            req,
            FlattenRequest::new("/data/inbox", FlattenMode::FullDepth)
                .dry_run(true)
                .parallel(true)
        );
    }

    #[test]
    fn builder_defaults_to_a_real_sequential_run() {
        let req = FlattenRequest::new("/r", FlattenMode::OneLevel);
        assert!(!req.dry_run);
        assert!(!req.parallel);
    }
}
