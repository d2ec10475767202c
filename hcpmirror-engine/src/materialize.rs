//! Materializing references to files in the local mirror.
//!
//! A reference must read the same as its source and stay write-isolated:
//! editing the reference never changes the source. Hard links and plain
//! symlinks both fail that, so the production [`CowCopier`] duplicates through
//! `std::fs::copy`, which hands the work to the kernel (`copy_file_range` on
//! Linux, `fcopyfile` on macOS). The copy shares extents only where the
//! filesystem supports reflinks (btrfs, XFS, APFS); elsewhere, ext4 included,
//! it is a full copy.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{io_err, walk_err, EngineError};
use crate::tree::ensure_dir;

/// Creates `dest` as a reference to `source`.
pub trait Materializer {
    fn materialize_reference(&self, source: &Path, dest: &Path) -> Result<(), EngineError>;
}

/// Copy-on-write duplication of files, directories and symlinks.
///
/// Symlinks inside the mirror are recreated verbatim, never followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct CowCopier;

impl Materializer for CowCopier {
    fn materialize_reference(&self, source: &Path, dest: &Path) -> Result<(), EngineError> {
        let meta = std::fs::symlink_metadata(source).map_err(|e| io_err(source, e))?;
        if meta.file_type().is_symlink() {
            return copy_symlink(source, dest);
        }
        if !meta.is_dir() {
            return copy_file(source, dest);
        }

        ensure_dir(dest)?;
        for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
            let entry = entry.map_err(|e| walk_err(source, e))?;
            let path = entry.path();
            let rel = path
                .strip_prefix(source)
                .map_err(|_| io_err(path, std::io::Error::other("entry outside walk root")))?;
            let out = dest.join(rel);
            let kind = entry.file_type();
            if kind.is_dir() {
                ensure_dir(&out)?;
            } else if kind.is_symlink() {
                copy_symlink(path, &out)?;
            } else {
                copy_file(path, &out)?;
            }
        }
        Ok(())
    }
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), EngineError> {
    std::fs::copy(source, dest).map_err(|e| io_err(dest, e))?;
    tracing::debug!("copied {} -> {}", source.display(), dest.display());
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, dest: &Path) -> Result<(), EngineError> {
    let target = std::fs::read_link(source).map_err(|e| io_err(source, e))?;
    if std::fs::symlink_metadata(dest).is_ok() {
        std::fs::remove_file(dest).map_err(|e| io_err(dest, e))?;
    }
    std::os::unix::fs::symlink(&target, dest).map_err(|e| io_err(dest, e))?;
    tracing::debug!("linked {} -> {}", dest.display(), target.display());
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, dest: &Path) -> Result<(), EngineError> {
    copy_file(source, dest)
}
