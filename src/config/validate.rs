//! Root validation.
//! Every failure here is a fatal configuration error raised before any walking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::errors::FlattenError;

/// Root must exist, be a directory (symlinks to directories are accepted),
/// and be listable.
pub fn validate_root(root: &Path) -> Result<PathBuf, FlattenError> {
    let meta = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!(root = %root.display(), "root does not exist");
            return Err(FlattenError::RootNotFound(root.to_path_buf()));
        }
        Err(e) => {
            error!(root = %root.display(), error = %e, "cannot stat root");
            return Err(FlattenError::RootUnreadable {
                path: root.to_path_buf(),
                context: e.to_string(),
            });
        }
    };
    if !meta.is_dir() {
        error!(root = %root.display(), "root is not a directory");
        return Err(FlattenError::RootNotDirectory(root.to_path_buf()));
    }

    fs::read_dir(root).map_err(|e| FlattenError::RootUnreadable {
        path: root.to_path_buf(),
        context: format!("cannot list directory; check permissions ({e})"),
    })?;

    let canonical = dunce::canonicalize(root).map_err(|e| FlattenError::RootUnreadable {
        path: root.to_path_buf(),
        context: format!("cannot resolve path ({e})"),
    })?;
    debug!(root = %canonical.display(), "root readable");
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_not_found() {
        let td = tempfile::tempdir().unwrap();
        let err = validate_root(&td.path().join("nope")).unwrap_err();
        assert!(matches!(err, FlattenError::RootNotFound(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn file_root_is_not_directory() {
        let td = tempfile::tempdir().unwrap();
        let f = td.path().join("file.txt");
        fs::write(&f, b"x").unwrap();
        let err = validate_root(&f).unwrap_err();
        assert!(matches!(err, FlattenError::RootNotDirectory(_)));
    }

    #[test]
    fn valid_root_is_canonicalized() {
        let td = tempfile::tempdir().unwrap();
        fs::create_dir(td.path().join("inner")).unwrap();
        let dotted = td.path().join("inner").join("..");
        let got = validate_root(&dotted).unwrap();
        assert_eq!(got, dunce::canonicalize(td.path()).unwrap());
    }
}
