//! Location of the content block directories.
//!
//! Blocks live in `<public path>/<base subpath>/<block>/`. Paths recorded for
//! the frontend (icons, translation files) are relative to the public path,
//! which is why the two parts are kept apart.

use std::env;
use std::path::{Path, PathBuf};

/// Subpath below the public root holding one directory per content block.
pub const DEFAULT_BASE_SUBPATH: &str = "typo3conf/contentBlocks/";

/// Environment variable naming the public root directory.
pub const PUBLIC_PATH_ENV: &str = "CONTENT_BLOCKS_PUBLIC_PATH";

/// Environment variable overriding [`DEFAULT_BASE_SUBPATH`].
pub const BASE_SUBPATH_ENV: &str = "CONTENT_BLOCKS_BASE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlockPaths {
    public_path: PathBuf,
    base_subpath: String,
}

impl ContentBlockPaths {
    pub fn new(public_path: impl Into<PathBuf>) -> Self {
        Self {
            public_path: public_path.into(),
            base_subpath: DEFAULT_BASE_SUBPATH.to_string(),
        }
    }

    /// Resolve paths from `CONTENT_BLOCKS_PUBLIC_PATH` and `CONTENT_BLOCKS_BASE_PATH`.
    ///
    /// Without a public path the current working directory is used.
    pub fn from_env() -> Self {
        let public_path = env::var_os(PUBLIC_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let paths = Self::new(public_path);
        match env::var(BASE_SUBPATH_ENV) {
            Ok(subpath) if !subpath.trim().is_empty() => paths.with_base_subpath(subpath),
            _ => paths,
        }
    }

    /// Replace the base subpath. A trailing `/` is added when missing and
    /// leading separators are dropped so the subpath stays relative.
    pub fn with_base_subpath(mut self, subpath: impl Into<String>) -> Self {
        let subpath = subpath.into();
        let mut subpath = subpath.trim().trim_start_matches('/').to_string();
        if !subpath.is_empty() && !subpath.ends_with('/') {
            subpath.push('/');
        }
        self.base_subpath = subpath;
        self
    }

    pub fn public_path(&self) -> &Path {
        &self.public_path
    }

    /// Subpath relative to the public root, always ending with `/` unless empty.
    pub fn base_subpath(&self) -> &str {
        &self.base_subpath
    }

    /// Absolute directory enumerated for content blocks.
    pub fn base_dir(&self) -> PathBuf {
        self.public_path.join(&self.base_subpath)
    }

    /// Path of a block directory relative to the public root, ending with `/`.
    pub fn relative_block_path(&self, dir_name: &str) -> String {
        format!("{}{}/", self.base_subpath, dir_name)
    }
}
