//! Directory trees that sources are collected from.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::CollectError;

/// Read-only view of a directory tree.
///
/// The collector only needs to know whether a root is a directory and which
/// files live beneath it; tests swap the disk for an in-memory tree.
pub trait SourceTree {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Every regular file under `root`, at any depth.
    fn files(&self, root: &Path) -> Result<Vec<PathBuf>, CollectError>;
}

/// The real filesystem, walked with `walkdir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskTree {
    follow_links: bool,
}

impl DiskTree {
    pub fn new() -> Self {
        DiskTree::default()
    }

    /// Descend into symlinked directories. Link cycles become errors.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }
}

impl SourceTree for DiskTree {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn files(&self, root: &Path) -> Result<Vec<PathBuf>, CollectError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| CollectError::Walk {
                path: e.path().unwrap_or(root).to_path_buf(),
                source: e.into(),
            })?;

            let ty = entry.file_type();
            // Unfollowed links still count when they point at a file.
            let is_file = ty.is_file() || (ty.is_symlink() && entry.path().is_file());
            if is_file {
                files.push(entry.into_path());
            }
        }

        tracing::trace!("{} file(s) under {}", files.len(), root.display());
        Ok(files)
    }
}
