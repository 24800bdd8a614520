//! Collision-free destination naming.
//!
//! Policy:
//! - A free desired path is returned unchanged.
//! - Otherwise files get `stem_N.ext` and directories get `name_N`, probing
//!   N = 1, 2, 3, ... and returning the first free candidate.
//! - Names are never truncated, and an existing `_<digits>` tail is not
//!   reinterpreted as a counter (`a_1.txt` collides into `a_1_1.txt`).
//!
//! Notes:
//! - This only decides the name from the current filesystem state. Callers that
//!   move concurrently must go through `RunLedger::claim`, which holds a lock
//!   around the check and also treats names handed out earlier as taken.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::trace;

use super::walk::EntryKind;
use crate::errors::FlattenError;

/// Upper bound on numbered candidates before giving up.
pub const MAX_COLLISION_SUFFIX: u64 = 1_000_000;

/// Outcome of resolving a desired destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    /// The N of `_N` when a suffix was needed.
    pub suffix: Option<u64>,
}

/// True if anything (including a dangling symlink) occupies `path`.
pub fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Resolve `desired` against the filesystem only.
pub fn resolve(desired: &Path, kind: EntryKind) -> Result<Resolved, FlattenError> {
    resolve_with(desired, kind, MAX_COLLISION_SUFFIX, occupied)
}

/// Resolve `desired`, treating a candidate as taken when `is_taken` says so.
pub fn resolve_with<F>(
    desired: &Path,
    kind: EntryKind,
    max_suffix: u64,
    is_taken: F,
) -> Result<Resolved, FlattenError>
where
    F: Fn(&Path) -> bool,
{
    if !is_taken(desired) {
        return Ok(Resolved {
            path: desired.to_path_buf(),
            suffix: None,
        });
    }

    let name = desired.file_name().ok_or_else(|| FlattenError::Io {
        path: desired.to_path_buf(),
        message: format!("destination has no file name: {}", desired.display()),
    })?;
    let (stem, ext) = split_name(name, kind);

    for n in 1..=max_suffix {
        let candidate = desired.with_file_name(suffixed_name(&stem, ext.as_deref(), n));
        if !is_taken(&candidate) {
            trace!(desired = %desired.display(), chosen = %candidate.display(), n, "collision resolved");
            return Ok(Resolved {
                path: candidate,
                suffix: Some(n),
            });
        }
    }

    Err(FlattenError::CollisionExhausted {
        desired: desired.to_path_buf(),
        tries: max_suffix,
    })
}

/// Split a name into the part that receives the suffix and the optional extension.
/// Directories keep their whole name as the stem.
fn split_name(name: &OsStr, kind: EntryKind) -> (OsString, Option<OsString>) {
    match kind {
        EntryKind::Directory => (name.to_os_string(), None),
        EntryKind::File => {
            let base = Path::new(name);
            let stem = base
                .file_stem()
                .map(OsStr::to_os_string)
                .unwrap_or_else(|| name.to_os_string());
            let ext = base.extension().map(OsStr::to_os_string);
            (stem, ext)
        }
    }
}

fn suffixed_name(stem: &OsStr, ext: Option<&OsStr>, n: u64) -> OsString {
    let mut out = OsString::with_capacity(stem.len() + 24);
    out.push(stem);
    out.push(format!("_{n}"));
    if let Some(e) = ext {
        out.push(".");
        out.push(e);
    }
    out
}
