//! Read-only filesystem access used while discovering content blocks.
//!
//! Everything that touches the disk goes through [`FileSystem`] so callers can
//! substitute their own implementation, e.g. to observe how often the disk is
//! hit once a configuration has been cached.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CbError, Result};

pub trait FileSystem {
    /// Immediate subdirectories of `dir`, sorted by file name. Files and hidden
    /// directories (`.git`, `.svn`, ...) are skipped.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Absolute path with symlinks resolved.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// True if `path` is a regular file that can be opened for reading.
    fn is_readable(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            CbError::Filesystem(format!("Failed to read directory {}: {}", dir.display(), e))
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        tracing::debug!("Found {} directories in {}", dirs.len(), dir.display());

        Ok(dirs)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| {
            CbError::Filesystem(format!("Failed to resolve {}: {}", path.display(), e))
        })
    }

    fn is_readable(&self, path: &Path) -> bool {
        path.is_file() && fs::File::open(path).is_ok()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            CbError::Filesystem(format!("Failed to read {}: {}", path.display(), e))
        })
    }
}
