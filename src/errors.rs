//! Typed error definitions for flatten_tree.
//! Fatal configuration failures abort a run before any mutation; everything
//! else is recorded per item in the run summary.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Cannot read root directory {path}: {context}")]
    RootUnreadable { path: PathBuf, context: String },

    #[error("Entry vanished before it could be processed: {0}")]
    Vanished(PathBuf),

    #[error("Permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    #[error("No free name for {desired} after {tries} numbered candidates")]
    CollisionExhausted { desired: PathBuf, tries: u64 },

    #[error("Cannot copy {0} across devices: not a regular file")]
    CrossDeviceCopy(PathBuf),

    #[error("Directory is not empty: {0}")]
    NotEmpty(PathBuf),

    #[error("{message}")]
    Io { path: PathBuf, message: String },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl FlattenError {
    /// Stable numeric code for logs and scripting.
    pub fn code(&self) -> u16 {
        match self {
            FlattenError::RootNotFound(_) => 10,
            FlattenError::RootNotDirectory(_) => 11,
            FlattenError::RootUnreadable { .. } => 12,
            FlattenError::Vanished(_) => 20,
            FlattenError::PermissionDenied { .. } => 21,
            FlattenError::CollisionExhausted { .. } => 22,
            FlattenError::CrossDeviceCopy(_) => 23,
            FlattenError::NotEmpty(_) => 24,
            FlattenError::Io { .. } => 25,
            FlattenError::Interrupted => 30,
        }
    }

    /// Short machine-readable kind, used in the summary.
    pub fn kind(&self) -> &'static str {
        match self {
            FlattenError::RootNotFound(_) => "root_not_found",
            FlattenError::RootNotDirectory(_) => "root_not_directory",
            FlattenError::RootUnreadable { .. } => "root_unreadable",
            FlattenError::Vanished(_) => "vanished",
            FlattenError::PermissionDenied { .. } => "permission_denied",
            FlattenError::CollisionExhausted { .. } => "collision_exhausted",
            FlattenError::CrossDeviceCopy(_) => "cross_device_copy",
            FlattenError::NotEmpty(_) => "not_empty",
            FlattenError::Io { .. } => "io",
            FlattenError::Interrupted => "interrupted",
        }
    }

    /// Fatal errors are configuration problems detected before walking.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FlattenError::RootNotFound(_)
                | FlattenError::RootNotDirectory(_)
                | FlattenError::RootUnreadable { .. }
        )
    }

    /// The path the error is about, when it carries one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FlattenError::RootNotFound(p)
            | FlattenError::RootNotDirectory(p)
            | FlattenError::Vanished(p)
            | FlattenError::CrossDeviceCopy(p)
            | FlattenError::NotEmpty(p) => Some(p),
            FlattenError::RootUnreadable { path, .. }
            | FlattenError::PermissionDenied { path, .. }
            | FlattenError::Io { path, .. } => Some(path),
            FlattenError::CollisionExhausted { desired, .. } => Some(desired),
            FlattenError::Interrupted => None,
        }
    }

    /// Classify an io::Error raised while operating on `path`.
    /// `message` should already carry the operation context and hints.
    pub fn from_io(path: &Path, err: &io::Error, message: String) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FlattenError::Vanished(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FlattenError::PermissionDenied {
                path: path.to_path_buf(),
                context: message,
            },
            _ => FlattenError::Io {
                path: path.to_path_buf(),
                message,
            },
        }
    }
}
