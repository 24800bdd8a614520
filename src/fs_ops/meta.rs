//! Metadata carry-over for copied files.
//! A rename keeps everything; the copy fallback creates a new inode, so
//! timestamps and (on Unix) permission bits are copied from the source.
//! Best-effort: failures are logged and ignored.

use filetime::{set_file_times, FileTime};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

pub(super) fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    match set_file_times(dest, at, mt) {
        Ok(()) => trace!(path = %dest.display(), "copied atime/mtime"),
        Err(e) => warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination"),
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o7777;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(mode)) {
            warn!(path = %dest.display(), error = %e, "failed to set permissions on destination");
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = fs::set_permissions(dest, src_meta.permissions()) {
            warn!(path = %dest.display(), error = %e, "failed to set permissions on destination");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mtime_is_copied() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::write(&src, b"a").unwrap();
        fs::write(&dst, b"a").unwrap();
        let old = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, old).unwrap();

        preserve_metadata(&dst, &fs::metadata(&src).unwrap());
        let got = FileTime::from_last_modification_time(&fs::metadata(&dst).unwrap());
        assert_eq!(got.unix_seconds(), 1_000_000_000);
    }

    #[cfg(unix)]
    #[test]
    fn mode_is_copied() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::write(&src, b"a").unwrap();
        fs::write(&dst, b"a").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

        preserve_metadata(&dst, &fs::metadata(&src).unwrap());
        assert_eq!(fs::metadata(&dst).unwrap().permissions().mode() & 0o777, 0o640);
    }
}
