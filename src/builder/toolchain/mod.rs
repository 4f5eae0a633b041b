//! Toolchain abstraction for C/C++ compilers.
//!
//! A toolchain knows how to spell a compile command and a shared-library
//! link command for its compiler family. It never runs anything itself;
//! commands are handed to an [`Executor`](crate::builder::Executor).
//!
//! Toolchain detection priority:
//! 1. `[toolchain]` in `.extbuild/config.toml` or `~/.extbuild/config.toml`
//! 2. Environment variables (CC, CXX)
//! 3. MSVC from a developer prompt (Windows)
//! 4. Auto-detection (searching PATH for common compilers)

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::language::{Language, Standard};
use crate::core::workspace::Profile;

mod detect;
mod gcc;
mod msvc;

pub use detect::{detect_toolchain_with};
pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// Options that apply to every compile step of a build.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Language standard, if the manifest pins one
    pub std: Option<Standard>,
    /// Build profile (debug info vs optimization)
    pub profile: Profile,
}

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "g++", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Environment variables to set
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The command line as a single string, for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Input for a compile step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Include directories
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (name, optional value)
    pub defines: Vec<(String, Option<String>)>,
    /// Additional compiler flags, passed verbatim after the toolchain's own
    pub cflags: Vec<String>,
}

/// Input for a shared-library link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link
    pub objects: Vec<PathBuf>,
    /// Output shared library
    pub output: PathBuf,
    /// Additional linker flags, passed verbatim
    pub ldflags: Vec<String>,
}

/// The family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolchainPlatform {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
    /// Microsoft Visual C++
    Msvc,
}

impl ToolchainPlatform {
    /// Get the platform name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainPlatform::Gcc => "gcc",
            ToolchainPlatform::Clang => "clang",
            ToolchainPlatform::AppleClang => "apple-clang",
            ToolchainPlatform::Msvc => "msvc",
        }
    }
}

/// Trait for toolchain implementations.
pub trait Toolchain: Send + Sync {
    /// Get the toolchain platform.
    fn platform(&self) -> ToolchainPlatform;

    /// Compiler driver for a language.
    fn compiler_path(&self, lang: Language) -> &Path;

    /// Generate a compile command.
    fn compile_command(
        &self,
        input: &CompileInput,
        lang: Language,
        opts: &CompileOptions,
    ) -> CommandSpec;

    /// Generate a link command for a shared library.
    fn link_shared_command(&self, input: &LinkInput, lang: Language, opts: &CompileOptions)
        -> CommandSpec;

    /// Get the object file extension.
    fn object_extension(&self) -> &str;

    /// Get the shared library extension.
    fn shared_lib_extension(&self) -> &str;
}

/// Split `NAME=VALUE` define strings into pairs.
pub fn parse_defines(defines: &[String]) -> Vec<(String, Option<String>)> {
    defines
        .iter()
        .map(|d| match d.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (d.clone(), None),
        })
        .collect()
}
