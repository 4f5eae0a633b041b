//! Extension.toml manifest parsing and schema.
//!
//! The manifest replaces the hand-edited variable block of a classic
//! `setup.py`: module name, source roots, recognized extensions, include
//! directories, and verbatim compiler flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::language::{Language, Standard};

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Extension.toml";

/// Top-level manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Module identity
    pub module: ModuleSection,

    /// Where sources live
    #[serde(default)]
    pub sources: SourcesSection,

    /// Compiler inputs
    #[serde(default)]
    pub build: BuildSection,

    /// Artifact naming
    #[serde(default)]
    pub artifact: ArtifactSection,
}

/// `[module]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleSection {
    /// Module name (e.g. "toolbox")
    pub name: String,

    /// Prefix prepended to the artifact stem
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Source language
    #[serde(default)]
    pub language: Language,
}

/// `[sources]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourcesSection {
    /// Directories searched recursively, relative to the manifest
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Recognized source extensions (with or without leading dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Descend into symlinked directories
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for SourcesSection {
    fn default() -> Self {
        SourcesSection {
            roots: default_roots(),
            extensions: default_extensions(),
            follow_links: false,
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    /// Include directories, relative to the manifest
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Extra compiler flags, passed verbatim
    #[serde(default)]
    pub flags: Vec<String>,

    /// Extra linker flags, passed verbatim
    #[serde(default)]
    pub ldflags: Vec<String>,

    /// Preprocessor defines (`NAME` or `NAME=VALUE`)
    #[serde(default)]
    pub defines: Vec<String>,

    /// Language standard (e.g. "20" for C++20)
    pub std: Option<String>,

    /// Output directory, relative to the manifest
    pub out_dir: Option<PathBuf>,
}

/// `[artifact]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactSection {
    /// Explicit ABI suffix (e.g. ".cpython-311-x86_64-linux-gnu.so")
    pub suffix: Option<String>,

    /// Interpreter queried for its extension suffix and include directory
    pub interpreter: Option<String>,

    /// Strip the ABI suffix from the artifact name
    #[serde(default = "default_true")]
    pub strip_suffix: bool,

    /// Files copied next to the artifact after linking
    #[serde(default)]
    pub companions: Vec<PathBuf>,
}

impl Default for ArtifactSection {
    fn default() -> Self {
        ArtifactSection {
            suffix: None,
            interpreter: None,
            strip_suffix: true,
            companions: Vec::new(),
        }
    }
}

fn default_prefix() -> String {
    "_".to_string()
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}

fn default_extensions() -> Vec<String> {
    vec![".cpp".to_string(), ".cxx".to_string()]
}

fn default_true() -> bool {
    true
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse and validate manifest text.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Render a starter manifest for `extbuild init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[module]
name = "{name}"
prefix = "_"
language = "c++"

[sources]
roots = ["src"]
extensions = [".cpp", ".cxx"]

[build]
include-dirs = ["include"]
flags = []

[artifact]
strip-suffix = true
"#
        )
    }

    /// Artifact stem: prefix + module name.
    pub fn artifact_stem(&self) -> String {
        format!("{}{}", self.module.prefix, self.module.name)
    }

    /// Parsed language standard, if one is set.
    pub fn standard(&self) -> Result<Option<Standard>> {
        self.build
            .std
            .as_deref()
            .map(|s| self.module.language.parse_standard(s))
            .transpose()
            .map_err(Into::into)
    }

    fn validate(&self) -> Result<()> {
        let name = &self.module.name;
        if name.is_empty() {
            anyhow::bail!("module name must not be empty");
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            anyhow::bail!(
                "invalid module name `{}`: only ASCII letters, digits, `_` and `-` are allowed",
                name
            );
        }
        if self.sources.roots.is_empty() {
            anyhow::bail!("`sources.roots` must list at least one directory");
        }
        if self.sources.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            anyhow::bail!("`sources.extensions` contains an empty extension");
        }
        self.standard()?;
        Ok(())
    }
}
