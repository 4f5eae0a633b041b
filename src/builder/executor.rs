//! Running toolchain commands.
//!
//! The builder never spawns processes itself; it hands each [`CommandSpec`]
//! to an [`Executor`]. [`ProcessExecutor`] runs real processes, tests script
//! the compiler with a mock.

use std::io;

use crate::builder::toolchain::CommandSpec;
use crate::util::process::ProcessBuilder;

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::Output> for ProcessOutput {
    fn from(output: std::process::Output) -> Self {
        ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs a command to completion.
///
/// An `Err` means the process could not be started at all; a non-zero exit
/// is reported through [`ProcessOutput::code`].
pub trait Executor {
    fn run(&self, cmd: &CommandSpec) -> io::Result<ProcessOutput>;
}

/// Executes commands as child processes, blocking until each exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn run(&self, cmd: &CommandSpec) -> io::Result<ProcessOutput> {
        let mut pb = ProcessBuilder::new(&cmd.program).args(&cmd.args);
        for (key, value) in &cmd.env {
            pb = pb.env(key, value);
        }

        tracing::trace!("running {}", cmd.display());
        pb.output().map(ProcessOutput::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_process_executor_captures_output() {
        let out = ProcessExecutor
            .run(&CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 2"]))
            .unwrap();
        assert_eq!(out.code, Some(2));
        assert!(!out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn test_process_executor_spawn_failure() {
        let err = ProcessExecutor
            .run(&CommandSpec::new("/no/such/compiler"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
