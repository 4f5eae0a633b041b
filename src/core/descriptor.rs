//! Build descriptor - everything the toolchain needs for one module.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::language::{Language, Standard};
use crate::core::workspace::Workspace;
use crate::sources::{collect_sources, CollectError, ExtensionFilter, SourceFileList, SourceTree};

/// Inputs for one extension module build.
///
/// Built once from the workspace, consumed by the build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildDescriptor {
    /// Module name from the manifest
    pub module_name: String,
    /// File stem of the artifact (prefix + name)
    pub artifact_stem: String,
    pub language: Language,
    pub standard: Option<Standard>,
    /// Absolute source paths
    pub sources: SourceFileList,
    /// Absolute include directories
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (`NAME` or `NAME=VALUE`)
    pub defines: Vec<String>,
    /// Compiler flags, verbatim
    pub flags: Vec<String>,
    /// Linker flags, verbatim
    pub ldflags: Vec<String>,
    /// ABI suffix the toolchain convention appends, if known
    pub abi_suffix: Option<String>,
    /// Strip `abi_suffix` from the final artifact name
    pub strip_suffix: bool,
    /// Absolute paths of files copied next to the artifact
    pub companions: Vec<PathBuf>,
}

impl BuildDescriptor {
    /// Collect sources and gather the manifest's build inputs.
    ///
    /// Fails if any source root is missing.
    pub fn from_workspace<T>(ws: &Workspace, tree: &T) -> Result<Self, CollectError>
    where
        T: SourceTree + ?Sized,
    {
        let manifest = ws.manifest();

        let roots: Vec<PathBuf> = manifest
            .sources
            .roots
            .iter()
            .map(|r| ws.resolve(r))
            .collect();
        let filter = ExtensionFilter::new(&manifest.sources.extensions);

        let sources = collect_sources(tree, &roots, &filter)?;
        tracing::info!(
            "collected {} source file(s) matching {}",
            sources.len(),
            filter
        );

        Ok(BuildDescriptor {
            module_name: manifest.module.name.clone(),
            artifact_stem: manifest.artifact_stem(),
            language: manifest.module.language,
            // Validated when the manifest was loaded
            standard: manifest.standard().ok().flatten(),
            sources,
            include_dirs: manifest
                .build
                .include_dirs
                .iter()
                .map(|d| ws.resolve(d))
                .collect(),
            defines: manifest.build.defines.clone(),
            flags: manifest.build.flags.clone(),
            ldflags: manifest.build.ldflags.clone(),
            abi_suffix: manifest.artifact.suffix.clone(),
            strip_suffix: manifest.artifact.strip_suffix,
            companions: manifest
                .artifact
                .companions
                .iter()
                .map(|c| ws.resolve(c))
                .collect(),
        })
    }

    /// Replace the ABI suffix (command-line or interpreter supplied).
    pub fn with_abi_suffix(mut self, suffix: Option<String>) -> Self {
        if suffix.is_some() {
            self.abi_suffix = suffix;
        }
        self
    }

    /// Append an include directory unless it is already listed.
    pub fn add_include_dir(&mut self, dir: PathBuf) {
        if !self.include_dirs.contains(&dir) {
            self.include_dirs.push(dir);
        }
    }

    /// Put configured flags ahead of the manifest's own.
    pub fn prepend_flags(&mut self, cflags: &[String], ldflags: &[String]) {
        self.flags.splice(0..0, cflags.iter().cloned());
        self.ldflags.splice(0..0, ldflags.iter().cloned());
    }
}
