//! Run results: one `MoveResult` per relocated file and the `RunSummary`
//! handed back by the orchestrator. Everything serializes to JSON; paths are
//! written lossily so a non-UTF-8 name cannot break the report.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::config::FlattenMode;
use crate::errors::FlattenError;

fn lossy_path<S: Serializer>(p: &Path, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&p.to_string_lossy())
}

fn lossy_paths<S: Serializer>(ps: &[PathBuf], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(ps.iter().map(|p| p.to_string_lossy()))
}

/// How a file reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMethod {
    Renamed,
    /// Copied across devices, then the source was deleted.
    Copied,
    /// Dry-run: nothing moved.
    Planned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    #[serde(serialize_with = "lossy_path")]
    pub source_path: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub destination_path: PathBuf,
    /// N when the destination had to become `stem_N.ext`.
    pub collision_suffix_applied: Option<u64>,
    pub method: MoveMethod,
}

/// A non-fatal failure recorded against one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    pub kind: &'static str,
    pub code: u16,
    pub reason: String,
}

impl ItemError {
    pub fn new(path: &Path, err: &FlattenError) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: err.kind(),
            code: err.code(),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    #[serde(serialize_with = "lossy_path")]
    pub root: PathBuf,
    pub mode: FlattenMode,
    pub dry_run: bool,
    pub moved_count: usize,
    pub pruned_directory_count: usize,
    /// In discovery order.
    pub moves: Vec<MoveResult>,
    #[serde(serialize_with = "lossy_paths")]
    pub pruned: Vec<PathBuf>,
    pub errors: Vec<ItemError>,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new(root: PathBuf, mode: FlattenMode, dry_run: bool) -> Self {
        Self {
            root,
            mode,
            dry_run,
            moved_count: 0,
            pruned_directory_count: 0,
            moves: Vec::new(),
            pruned: Vec::new(),
            errors: Vec::new(),
            interrupted: false,
        }
    }

    pub(crate) fn record_move(&mut self, m: MoveResult) {
        self.moved_count += 1;
        self.moves.push(m);
    }

    pub(crate) fn record_prune(&mut self, dir: PathBuf) {
        self.pruned_directory_count += 1;
        self.pruned.push(dir);
    }

    pub(crate) fn record_error(&mut self, path: &Path, err: &FlattenError) {
        self.errors.push(ItemError::new(path, err));
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }
}
