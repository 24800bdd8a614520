//! I/O error enrichment.
//!
//! Turns a raw io::Error into a `FlattenError` whose message names the
//! operation and path and, where the OS code is recognizable, adds a hint.
//!
//! Usage:
//!   fs::remove_dir(dir).map_err(io_error_with_help("remove directory", dir))?;

use std::io;
use std::path::Path;

use crate::errors::FlattenError;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub(crate) fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
            libc::EBUSY => Some("resource busy; ensure no other process is using it"),
            libc::ENOENT => Some("path not found; it may have been moved or deleted meanwhile"),
            libc::EEXIST => Some("already exists"),
            libc::ENOTEMPTY => Some("directory is not empty"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem"),
            libc::ENAMETOOLONG => Some("filename or path too long"),
            libc::EMFILE | libc::ENFILE => Some("too many open files"),
            _ => None,
        };
        if let Some(h) = hint {
            msg.push_str(" - ");
            msg.push_str(h);
        }
        msg.push_str(&format!(" [os code: {}]", code));
        return msg;
    }

    let hint = match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved or deleted meanwhile"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    };
    if let Some(h) = hint {
        msg.push_str(" - ");
        msg.push_str(h);
    }
    msg
}

/// Closure for `.map_err(...)` converting io::Error -> FlattenError with context.
pub(crate) fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FlattenError + 'a {
    move |e: io::Error| FlattenError::from_io(path, &e, build_message(op, path, &e))
}

/// Same as [`io_error_with_help`] but keeps an io::Error (preserving its kind),
/// for helpers that return io::Result.
pub(crate) fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
