//! Global context for extbuild operations.
//!
//! Holds the current directory and the command-line overrides every command
//! needs, and knows where the manifest and configuration files live.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::{find_manifest_upward, Profile, Workspace};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Explicit `--manifest-path`
    manifest_path: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a context rooted at the process's current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            manifest_path: None,
            verbose: false,
        }
    }

    /// Use an explicit manifest instead of searching for one.
    pub fn with_manifest_path(mut self, path: Option<PathBuf>) -> Self {
        self.manifest_path = path.map(|p| {
            if p.is_absolute() {
                p
            } else {
                self.cwd.join(p)
            }
        });
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find `Extension.toml`: the explicit path if given, otherwise search
    /// upward from the current directory.
    pub fn find_manifest(&self) -> Result<PathBuf> {
        match &self.manifest_path {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => anyhow::bail!("manifest not found: {}", path.display()),
            None => Ok(find_manifest_upward(&self.cwd)?),
        }
    }

    /// Load merged global + project configuration for a project root.
    pub fn config(&self, project_root: &Path) -> Config {
        let global = global_config_path();
        load_config(global.as_deref(), &project_config_path(project_root))
    }

    /// Open the workspace for the manifest, applying config defaults.
    ///
    /// `release` comes from the command line; config can also turn it on.
    pub fn workspace(&self, release: bool) -> Result<(Workspace, Config)> {
        let manifest_path = self.find_manifest()?;
        tracing::debug!("using manifest {}", manifest_path.display());

        let mut ws = Workspace::new(&manifest_path)?;
        let config = self.config(ws.root());

        if ws.manifest().build.out_dir.is_none() {
            if let Some(ref dir) = config.build.out_dir {
                ws = ws.with_target_dir(dir.clone());
            }
        }

        let profile = Profile::from_release(release || config.build.release);
        Ok((ws.with_profile(profile), config))
    }
}
