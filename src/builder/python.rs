//! Querying a Python interpreter for extension build settings.
//!
//! An interpreter knows the filename suffix its importer expects
//! (`EXT_SUFFIX`, e.g. `.cpython-311-x86_64-linux-gnu.so`) and where its C
//! headers live (`INCLUDEPY`). Both are read through `sysconfig`.

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::builder::executor::Executor;
use crate::builder::toolchain::CommandSpec;

const QUERY: &str = "import sysconfig\n\
print(sysconfig.get_config_var('EXT_SUFFIX') or '')\n\
print(sysconfig.get_config_var('INCLUDEPY') or '')";

/// Settings reported by an interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterInfo {
    pub ext_suffix: Option<String>,
    pub include_dir: Option<PathBuf>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum InterpreterError {
    #[error("failed to run interpreter `{}`", program.display())]
    #[diagnostic(
        code(extbuild::interpreter::spawn),
        help("check `artifact.interpreter` in Extension.toml")
    )]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interpreter `{}` failed to report its configuration\n{stderr}", program.display())]
    #[diagnostic(code(extbuild::interpreter::query))]
    Query { program: PathBuf, stderr: String },
}

/// Ask `interpreter` for its extension suffix and include directory.
pub fn query_interpreter(
    executor: &dyn Executor,
    interpreter: &Path,
) -> Result<InterpreterInfo, InterpreterError> {
    let cmd = CommandSpec::new(interpreter).args(["-c", QUERY]);
    let output = executor
        .run(&cmd)
        .map_err(|source| InterpreterError::Spawn {
            program: interpreter.to_path_buf(),
            source,
        })?;

    if !output.success() {
        return Err(InterpreterError::Query {
            program: interpreter.to_path_buf(),
            stderr: output.stderr,
        });
    }

    let info = parse_query_output(&output.stdout);
    tracing::debug!(
        "interpreter {}: suffix {:?}, include {:?}",
        interpreter.display(),
        info.ext_suffix,
        info.include_dir
    );
    Ok(info)
}

fn parse_query_output(stdout: &str) -> InterpreterInfo {
    let mut lines = stdout.lines().map(str::trim);

    InterpreterInfo {
        ext_suffix: non_empty(lines.next()).map(str::to_string),
        include_dir: non_empty(lines.next()).map(PathBuf::from),
    }
}

fn non_empty(line: Option<&str>) -> Option<&str> {
    line.filter(|s| !s.is_empty() && *s != "None")
}
