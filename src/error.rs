use std::fmt;
use std::io::{self, ErrorKind};

use camino::Utf8PathBuf;
use thiserror::Error;

/// What kind of entry a path holds or is expected to hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Directory => "directory",
            EntryKind::File => "file",
            EntryKind::Other => "special file",
        })
    }
}

/// Fatal failures while materializing a skeleton. An existing directory is never one.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("permission denied at {path}")]
    PermissionDenied {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no space left on device while creating {path}")]
    NoSpace {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: Utf8PathBuf, reason: String },

    #[error("{path} already exists as a {found}, expected a {expected}")]
    NameCollision {
        path: Utf8PathBuf,
        expected: EntryKind,
        found: EntryKind,
    },

    #[error("root of the description at {path} must be a directory")]
    RootNotDirectory { path: Utf8PathBuf },

    #[error("i/o failure at {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MaterializeError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
                MaterializeError::PermissionDenied { path, source }
            }
            ErrorKind::StorageFull | ErrorKind::QuotaExceeded => {
                MaterializeError::NoSpace { path, source }
            }
            ErrorKind::InvalidInput | ErrorKind::InvalidData | ErrorKind::InvalidFilename => {
                MaterializeError::InvalidPath {
                    path,
                    reason: source.to_string(),
                }
            }
            _ => MaterializeError::Io { path, source },
        }
    }

    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            MaterializeError::PermissionDenied { path, .. }
            | MaterializeError::NoSpace { path, .. }
            | MaterializeError::InvalidPath { path, .. }
            | MaterializeError::NameCollision { path, .. }
            | MaterializeError::RootNotDirectory { path }
            | MaterializeError::Io { path, .. } => path,
        }
    }
}
