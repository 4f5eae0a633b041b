//! Workspace - the manifest, its root directory, and the output layout.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::manifest::{Manifest, MANIFEST_NAME};

/// Errors locating the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Extension.toml` in `{}` or any parent directory", dir.display())]
    NotFound { dir: PathBuf },
}

/// Look for the manifest in `dir` only.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(MANIFEST_NAME);
    candidate.is_file().then_some(candidate)
}

/// Look for the manifest in `start` and then each parent directory.
pub fn find_manifest_upward(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        if let Some(path) = find_manifest(&current) {
            return Ok(path);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}

/// Build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Debug,
    Release,
}

impl Profile {
    pub fn from_release(release: bool) -> Self {
        if release {
            Profile::Release
        } else {
            Profile::Debug
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Debug => "debug",
            Profile::Release => "release",
        }
    }

    pub fn is_debug(&self) -> bool {
        *self == Profile::Debug
    }
}

/// A loaded manifest together with where its outputs go.
#[derive(Debug)]
pub struct Workspace {
    manifest: Manifest,
    root: PathBuf,
    target_dir: PathBuf,
    profile: Profile,
}

impl Workspace {
    /// Create a workspace from a manifest path.
    ///
    /// The target directory defaults to `.extbuild/target` next to the
    /// manifest, or `build.out-dir` when the manifest sets one.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let root = std::path::absolute(&root).unwrap_or(root);

        let target_dir = match &manifest.build.out_dir {
            Some(dir) => root.join(dir),
            None => root.join(".extbuild").join("target"),
        };

        Ok(Workspace {
            manifest,
            root,
            target_dir,
            profile: Profile::Debug,
        })
    }

    /// Override the target directory (used when the config sets one).
    pub fn with_target_dir(mut self, target_dir: PathBuf) -> Self {
        self.target_dir = if target_dir.is_absolute() {
            target_dir
        } else {
            self.root.join(target_dir)
        };
        self
    }

    /// Set the build profile.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Top-level target directory (`clean` removes this).
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Directory the artifact is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.target_dir.join(self.profile.as_str())
    }

    /// Directory object files are written to.
    pub fn object_dir(&self) -> PathBuf {
        self.output_dir().join("obj")
    }

    /// Resolve a manifest-relative path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
