//! Cross-device fallback: copy to a temp file, then rename into place.
//!
//! Steps:
//! - stream src -> hidden temp file in the destination directory (fsynced)
//! - carry timestamps/permissions over
//! - no-clobber rename temp -> dest
//!
//! The source is left alone; the caller deletes it only after this returns Ok,
//! so every file exists in full at one location or the other at all times.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use super::atomic::rename_no_clobber;
use super::helpers::io_error_with_help_io;
use super::{io_copy, meta, util};

/// Copy `src` to `dest` via a temp sibling of `dest`. Returns bytes copied.
pub(super) fn safe_copy_and_rename(src: &Path, dest: &Path) -> io::Result<u64> {
    let dest_dir = dest.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination has no parent: {}", dest.display()),
        )
    })?;
    let src_meta = fs::metadata(src).map_err(io_error_with_help_io("stat source", src))?;

    let tmp = util::unique_temp_path(dest_dir);
    let bytes = match io_copy::copy_streaming(src, &tmp) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(io_error_with_help_io("copy to temporary file", &tmp)(e));
        }
    };
    meta::preserve_metadata(&tmp, &src_meta);

    if let Err(e) = rename_no_clobber(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help_io("rename temporary file into place", dest)(e));
    }
    debug!(src = %src.display(), dest = %dest.display(), bytes, "copied across devices");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_and_leaves_no_temp_behind() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("src");
        let dst_dir = td.path().join("dst");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&dst_dir).unwrap();
        let src = src_dir.join("f.txt");
        fs::write(&src, b"payload").unwrap();

        let n = safe_copy_and_rename(&src, &dst_dir.join("f.txt")).unwrap();
        assert_eq!(n, 7);
        assert!(src.exists(), "source is removed by the caller, not here");
        let names: Vec<_> = fs::read_dir(&dst_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["f.txt".to_string()]);
    }

    #[test]
    fn occupied_destination_fails_and_cleans_temp() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst_dir = td.path().join("dst");
        fs::create_dir_all(&dst_dir).unwrap();
        fs::write(&src, b"new").unwrap();
        fs::write(dst_dir.join("a.txt"), b"old").unwrap();

        let err = safe_copy_and_rename(&src, &dst_dir.join("a.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(dst_dir.join("a.txt")).unwrap(), b"old");
        assert_eq!(fs::read_dir(&dst_dir).unwrap().count(), 1);
    }
}
