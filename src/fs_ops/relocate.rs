//! File relocation.
//! Picks a collision-free name through the run ledger, then renames; on a
//! cross-device error falls back to copy + rename and deletes the source only
//! once the copy is in place.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use super::atomic::rename_no_clobber;
use super::claim::RunLedger;
use super::copy::safe_copy_and_rename;
use super::helpers::{build_message, io_error_with_help};
use super::util::is_cross_device;
use super::walk::{DirectoryEntry, EntryKind};
use crate::errors::FlattenError;
use crate::summary::{MoveMethod, MoveResult};

/// Retries when another process takes our chosen name between resolve and rename.
const MAX_RACE_RETRIES: u32 = 3;

pub struct Relocator<'a> {
    ledger: &'a RunLedger,
    dry_run: bool,
}

impl<'a> Relocator<'a> {
    pub fn new(ledger: &'a RunLedger, dry_run: bool) -> Self {
        Self { ledger, dry_run }
    }

    /// Move `entry` into `destination_dir`, keeping its base name when free.
    pub fn relocate(
        &self,
        entry: &DirectoryEntry,
        destination_dir: &Path,
    ) -> Result<MoveResult, FlattenError> {
        let src = entry.path.as_path();
        let name = src.file_name().ok_or_else(|| FlattenError::Io {
            path: src.to_path_buf(),
            message: format!("source has no file name: {}", src.display()),
        })?;
        // Re-stat: the walk is live and the entry may be gone already.
        let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat source", src))?;
        let desired = destination_dir.join(name);

        let mut attempt = 0;
        loop {
            let resolved = self.ledger.claim(&desired, EntryKind::File)?;
            let dest = resolved.path;

            if self.dry_run {
                // Later claims and the pruner treat this path as already gone.
                self.ledger.mark_vacated(src);
                debug!(src = %src.display(), dest = %dest.display(), "dry-run: would move file");
                return Ok(MoveResult {
                    source_path: src.to_path_buf(),
                    destination_path: dest,
                    collision_suffix_applied: resolved.suffix,
                    method: MoveMethod::Planned,
                });
            }

            match move_one(src, &dest, &meta) {
                Ok(method) => {
                    info!(src = %src.display(), dest = %dest.display(), ?method, "Moved file");
                    return Ok(MoveResult {
                        source_path: src.to_path_buf(),
                        destination_path: dest,
                        collision_suffix_applied: resolved.suffix,
                        method,
                    });
                }
                Err(MoveFailure::Taken) if attempt < MAX_RACE_RETRIES => {
                    // The name stays claimed: something else occupies it now.
                    attempt += 1;
                    warn!(dest = %dest.display(), attempt, "destination taken before rename; resolving again");
                }
                Err(MoveFailure::Taken) => {
                    return Err(FlattenError::Io {
                        path: src.to_path_buf(),
                        message: format!(
                            "destination kept appearing before rename after {MAX_RACE_RETRIES} retries: {}",
                            dest.display()
                        ),
                    });
                }
                Err(MoveFailure::Failed(e)) => {
                    self.ledger.release(&dest);
                    return Err(e);
                }
            }
        }
    }
}

#[derive(Debug)]
enum MoveFailure {
    Taken,
    Failed(FlattenError),
}

fn move_one(src: &Path, dest: &Path, meta: &fs::Metadata) -> Result<MoveMethod, MoveFailure> {
    move_one_with(src, dest, meta, rename_no_clobber)
}

/// `move_one` with the rename step supplied by the caller.
fn move_one_with<R>(
    src: &Path,
    dest: &Path,
    meta: &fs::Metadata,
    rename: R,
) -> Result<MoveMethod, MoveFailure>
where
    R: Fn(&Path, &Path) -> io::Result<()>,
{
    let err = match rename(src, dest) {
        Ok(()) => return Ok(MoveMethod::Renamed),
        Err(e) => e,
    };
    if err.kind() == io::ErrorKind::AlreadyExists {
        return Err(MoveFailure::Taken);
    }
    if !is_cross_device(&err) {
        return Err(MoveFailure::Failed(io_error_with_help("rename file", src)(err)));
    }

    if !meta.is_file() {
        return Err(MoveFailure::Failed(FlattenError::CrossDeviceCopy(src.to_path_buf())));
    }
    warn!(src = %src.display(), dest = %dest.display(), "rename crosses devices; copying instead");
    match safe_copy_and_rename(src, dest) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(MoveFailure::Taken),
        Err(e) => {
            let message = e.to_string();
            return Err(MoveFailure::Failed(FlattenError::from_io(src, &e, message)));
        }
    }
    // The copy is complete and durable; only now may the source go.
    fs::remove_file(src).map_err(|e| {
        MoveFailure::Failed(FlattenError::Io {
            path: src.to_path_buf(),
            message: format!(
                "copied to '{}' but {}",
                dest.display(),
                build_message("could not remove source", src, &e)
            ),
        })
    })?;
    Ok(MoveMethod::Copied)
}
