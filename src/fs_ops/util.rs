use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of transient copy targets; never a user file name.
pub(crate) const TEMP_PREFIX: &str = ".flatten.";

pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!("{TEMP_PREFIX}{pid}.{nanos}.tmp"))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // io::ErrorKind::CrossesDevices is not stable everywhere; use raw codes.
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        // ERROR_NOT_SAME_DEVICE
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
