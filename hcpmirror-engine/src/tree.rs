//! Directory-tree helpers: create, remove, and open up for writing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hcpmirror_core::SubjectId;
use walkdir::WalkDir;

use crate::error::{io_err, walk_err, EngineError};

/// Deletes a whole subtree.
pub trait TreeRemover {
    /// Remove `path` and everything under it.
    ///
    /// Returns `Ok(false)` if `path` did not exist.
    fn remove_tree(&self, path: &Path) -> Result<bool, EngineError>;
}

/// [`TreeRemover`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl TreeRemover for FsRemover {
    fn remove_tree(&self, path: &Path) -> Result<bool, EngineError> {
        let meta = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(io_err(path, e)),
        };
        let removed = if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        removed.map_err(|e| io_err(path, e))?;
        Ok(true)
    }
}

/// `<root>/<subject>`, refusing ids that would land anywhere but directly
/// under `root`.
pub fn subject_dir(root: &Path, subject: &SubjectId) -> Result<PathBuf, EngineError> {
    if !subject.is_single_component() {
        return Err(EngineError::InvalidSubject {
            subject: subject.to_string(),
        });
    }
    Ok(root.join(subject))
}

/// `mkdir -p`.
pub fn ensure_dir(path: &Path) -> Result<(), EngineError> {
    std::fs::create_dir_all(path).map_err(|e| io_err(path, e))
}

/// True if anything (including a dangling symlink) sits at `path`.
pub fn entry_exists(path: &Path) -> Result<bool, EngineError> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Add owner write permission to `root` and everything below it.
///
/// Symlinks are not followed. A missing `root` is a no-op.
pub fn grant_write_recursive(root: &Path) -> Result<(), EngineError> {
    if !entry_exists(root)? {
        return Ok(());
    }
    // Parents are yielded before their children are listed, so a directory
    // is writable before anything inside it is touched.
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| walk_err(root, e))?;
        if entry.file_type().is_symlink() {
            continue;
        }
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| walk_err(path, e))?;
        let mut perms = meta.permissions();
        if add_owner_write(&mut perms) {
            std::fs::set_permissions(path, perms).map_err(|e| io_err(path, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn add_owner_write(perms: &mut std::fs::Permissions) -> bool {
    use std::os::unix::fs::PermissionsExt;
    let mode = perms.mode();
    if mode & 0o200 != 0 {
        return false;
    }
    perms.set_mode(mode | 0o200);
    true
}

#[cfg(not(unix))]
fn add_owner_write(perms: &mut std::fs::Permissions) -> bool {
    if !perms.readonly() {
        return false;
    }
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    true
}
