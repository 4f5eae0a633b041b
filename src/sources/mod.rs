//! Source collection.
//!
//! Walks the configured source roots and keeps every file whose extension is
//! on the allow-list. A missing root is a configuration error and aborts the
//! build before any compiler runs.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

mod tree;

pub use tree::{DiskTree, SourceTree};

/// Errors raised while collecting sources.
#[derive(Debug, Error, Diagnostic)]
pub enum CollectError {
    #[error("source directory `{}` does not exist or is not a directory", path.display())]
    #[diagnostic(
        code(extbuild::sources::missing_root),
        help("check `sources.roots` in Extension.toml")
    )]
    MissingRoot { path: PathBuf },

    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(extbuild::sources::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Set of recognized source file extensions.
///
/// Entries are stored with a leading dot; `"cpp"` and `".cpp"` are the same
/// entry. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .collect();
        ExtensionFilter { extensions }
    }

    /// Whether `path` has one of the recognized extensions.
    pub fn matches(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&format!(".{}", ext)),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<&str> = self.iter().collect();
        write!(f, "{}", list.join(", "))
    }
}

/// Ordered list of absolute source paths.
///
/// Roots appear in configuration order; files within a root are sorted by
/// path. A file reachable from two overlapping roots appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceFileList {
    files: Vec<PathBuf>,
}

impl SourceFileList {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files
    }
}

impl From<Vec<PathBuf>> for SourceFileList {
    fn from(files: Vec<PathBuf>) -> Self {
        SourceFileList { files }
    }
}

impl<'a> IntoIterator for &'a SourceFileList {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Collect every source file under `roots` whose extension passes `filter`.
///
/// Relative roots are made absolute against the current directory, so the
/// returned paths are always absolute.
pub fn collect_sources<T, P>(
    tree: &T,
    roots: &[P],
    filter: &ExtensionFilter,
) -> Result<SourceFileList, CollectError>
where
    T: SourceTree + ?Sized,
    P: AsRef<Path>,
{
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for root in roots {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|e| CollectError::Walk {
            path: root.to_path_buf(),
            source: e,
        })?;

        if !tree.is_dir(&root) {
            return Err(CollectError::MissingRoot { path: root });
        }

        let mut matched = 0usize;
        for file in tree.files(&root)? {
            if filter.matches(&file) && seen.insert(file.clone()) {
                files.push(file);
                matched += 1;
            }
        }

        tracing::debug!("{}: {} source file(s)", root.display(), matched);
    }

    Ok(SourceFileList { files })
}
