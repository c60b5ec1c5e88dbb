//! The only place that touches the filesystem.

use std::fs::{self, File, Metadata};
use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{EntryKind, MaterializeError};

/// Ensure a directory exists, creating it and any missing ancestors.
pub fn ensure_directory(path: &Utf8Path) -> Result<(), MaterializeError> {
    match existing_kind(path)? {
        Some(EntryKind::Directory) => return Ok(()),
        Some(found) => {
            return Err(MaterializeError::NameCollision {
                path: path.to_owned(),
                expected: EntryKind::Directory,
                found,
            });
        }
        None => {}
    }

    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        // Lost a race with another creator; fine as long as it is a directory.
        Err(err) if err.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(err) if matches!(err.kind(), ErrorKind::AlreadyExists | ErrorKind::NotADirectory) => {
            Err(collision_or_io(path, EntryKind::Directory, err))
        }
        Err(err) => Err(MaterializeError::from_io(path, err)),
    }
}

/// Create `path` (truncating an existing file) and write `contents` in full.
pub fn create_or_truncate_file(path: &Utf8Path, contents: &str) -> Result<(), MaterializeError> {
    if let Some(found @ (EntryKind::Directory | EntryKind::Other)) = existing_kind(path)? {
        return Err(MaterializeError::NameCollision {
            path: path.to_owned(),
            expected: EntryKind::File,
            found,
        });
    }

    let mut file = File::create(path).map_err(|err| {
        if err.kind() == ErrorKind::NotADirectory {
            collision_or_io(path, EntryKind::File, err)
        } else {
            MaterializeError::from_io(path, err)
        }
    })?;
    // `file` is dropped on every path out of this function, closing the handle.
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|err| MaterializeError::from_io(path, err))
}

pub fn join(base: &Utf8Path, name: &str) -> Utf8PathBuf {
    base.join(name)
}

fn existing_kind(path: &Utf8Path) -> Result<Option<EntryKind>, MaterializeError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(kind_of(&meta))),
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(err) => Err(MaterializeError::from_io(path, err)),
    }
}

fn kind_of(meta: &Metadata) -> EntryKind {
    if meta.is_dir() {
        EntryKind::Directory
    } else if meta.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

/// An ancestor of `path` is in the way; report the first one that is not a directory.
fn collision_or_io(path: &Utf8Path, expected: EntryKind, err: std::io::Error) -> MaterializeError {
    let blocker = path
        .ancestors()
        .skip(1)
        .find(|ancestor| ancestor.exists() && !ancestor.is_dir());
    match blocker {
        Some(blocker) => MaterializeError::NameCollision {
            path: blocker.to_owned(),
            expected: EntryKind::Directory,
            found: EntryKind::File,
        },
        None if path.exists() && !path.is_dir() => MaterializeError::NameCollision {
            path: path.to_owned(),
            expected,
            found: EntryKind::File,
        },
        None => MaterializeError::from_io(path, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn ensure_directory_creates_missing_ancestors() {
        let (_guard, root) = scratch();
        let target = root.join("a").join("b").join("c");
        ensure_directory(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let (_guard, root) = scratch();
        let target = root.join("again");
        ensure_directory(&target).unwrap();
        ensure_directory(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn ensure_directory_rejects_existing_file() {
        let (_guard, root) = scratch();
        let target = root.join("taken");
        fs::write(&target, "x").unwrap();
        let err = ensure_directory(&target).unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::NameCollision {
                expected: EntryKind::Directory,
                found: EntryKind::File,
                ..
            }
        ));
        assert_eq!(fs::read_to_string(&target).unwrap(), "x");
    }

    #[test]
    fn ensure_directory_reports_file_ancestor() {
        let (_guard, root) = scratch();
        let blocker = root.join("blocker");
        fs::write(&blocker, "").unwrap();
        let err = ensure_directory(&blocker.join("child")).unwrap_err();
        match err {
            MaterializeError::NameCollision { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_is_truncated_not_appended() {
        let (_guard, root) = scratch();
        let target = root.join("notes.txt");
        fs::write(&target, "a much longer previous body").unwrap();
        create_or_truncate_file(&target, "short").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "short");
    }

    #[test]
    fn file_over_directory_collides() {
        let (_guard, root) = scratch();
        let target = root.join("dir");
        fs::create_dir(&target).unwrap();
        let err = create_or_truncate_file(&target, "").unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::NameCollision {
                expected: EntryKind::File,
                found: EntryKind::Directory,
                ..
            }
        ));
        assert!(target.is_dir());
    }

    #[test]
    fn join_appends_one_segment() {
        assert_eq!(
            join(Utf8Path::new("base"), "child.txt"),
            Utf8Path::new("base").join("child.txt")
        );
    }
}
