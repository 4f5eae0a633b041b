//! Build errors.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::sources::CollectError;

/// Errors that abort a build.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Collect(#[from] CollectError),

    #[error("no source files found for module `{module}`")]
    #[diagnostic(
        code(extbuild::build::no_sources),
        help("check `sources.roots` and `sources.extensions` in Extension.toml")
    )]
    NoSources { module: String },

    #[error("compilation failed for `{}` (exit code {})\n{stderr}", source_file.display(), display_code(.code))]
    #[diagnostic(code(extbuild::build::compile))]
    Compilation {
        source_file: PathBuf,
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("linking failed for `{}` (exit code {})\n{stderr}", output.display(), display_code(.code))]
    #[diagnostic(code(extbuild::build::link))]
    Link {
        output: PathBuf,
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run `{}`", program.display())]
    #[diagnostic(
        code(extbuild::build::spawn),
        help("is the compiler installed and on PATH? set CC/CXX or `[toolchain]` in .extbuild/config.toml")
    )]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on `{}`", path.display())]
    #[diagnostic(code(extbuild::build::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Process exit code for this error.
    ///
    /// Compiler and linker failures pass the tool's own code through;
    /// everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Compilation { code: Some(c), .. } | BuildError::Link { code: Some(c), .. }
                if *c != 0 =>
            {
                *c
            }
            _ => 1,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none, killed by signal".to_string(),
    }
}
