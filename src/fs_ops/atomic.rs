//! No-clobber rename.
//! - Linux: renameat2(RENAME_NOREPLACE), so an occupied destination fails with
//!   EEXIST instead of being replaced, atomically.
//! - Elsewhere (or on filesystems without that flag): check, then rename.
//!   The check is not atomic against other processes.
//! - Unix: best-effort fsync of the destination directory afterwards.

use std::fs;
use std::io;
use std::path::Path;

use super::resolve::occupied;
use super::util::fsync_dir;

pub(super) fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(target_os = "linux")]
    match renameat2_noreplace(src, dst) {
        Ok(()) => {
            sync_parent(dst);
            return Ok(());
        }
        // EINVAL: the filesystem does not support the flag; ENOSYS: old kernel.
        Err(e) if matches!(e.raw_os_error(), Some(libc::EINVAL) | Some(libc::ENOSYS)) => {}
        Err(e) => return Err(e),
    }

    if occupied(dst) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination appeared before rename: {}", dst.display()),
        ));
    }
    fs::rename(src, dst)?;
    sync_parent(dst);
    Ok(())
}

fn sync_parent(dst: &Path) {
    if let Some(parent) = dst.parent() {
        // A successful rename must not turn into a failure over fsync.
        let _ = fsync_dir(parent);
    }
}

#[cfg(target_os = "linux")]
fn renameat2_noreplace(src: &Path, dst: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let to_c = |p: &Path| {
        CString::new(p.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"))
    };
    let src_c = to_c(src)?;
    let dst_c = to_c(dst)?;
    // SAFETY: both pointers come from live CStrings; AT_FDCWD resolves relative paths.
    let rc = unsafe {
        libc::syscall(
            libc::SYS_renameat2,
            libc::AT_FDCWD,
            src_c.as_ptr(),
            libc::AT_FDCWD,
            dst_c.as_ptr(),
            libc::RENAME_NOREPLACE,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renames_into_free_slot() {
        let td = tempdir().unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::write(&a, b"x").unwrap();
        rename_no_clobber(&a, &b).unwrap();
        assert!(!a.exists());
        assert_eq!(fs::read(&b).unwrap(), b"x");
    }

    #[test]
    fn never_replaces_existing_destination() {
        let td = tempdir().unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::write(&a, b"new").unwrap();
        fs::write(&b, b"old").unwrap();
        let err = rename_no_clobber(&a, &b).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&b).unwrap(), b"old");
        assert_eq!(fs::read(&a).unwrap(), b"new");
    }
}
