//! Test utilities and mocks for extbuild unit tests.
//!
//! This module provides mock implementations of the two seams a build
//! crosses: the source tree and process execution.
//!
//! # Example
//!
//! ```rust,ignore
//! use extbuild::test_support::{MockFileSystem, MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let mut fs = MockFileSystem::new();
//!     fs.add_file("/proj/src/a.cpp", "");
//!
//!     let exec = MockExecutor::new();
//!     exec.expect_prefix("g++ -c", MockProcessOutput::success(""));
//!
//!     // Use mocks in tests...
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::builder::executor::{Executor, ProcessOutput};
use crate::builder::toolchain::CommandSpec;
use crate::sources::{CollectError, SourceTree};

/// In-memory directory tree.
///
/// Adding a file creates its parent directories.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        MockFileSystem::default()
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path, content.into());
    }

    /// Add a directory and all of its ancestors.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    /// Check if a path is a file.
    pub fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

impl SourceTree for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn files(&self, root: &Path) -> Result<Vec<PathBuf>, CollectError> {
        Ok(self
            .files
            .keys()
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect())
    }
}

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            code: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<(CommandPattern, MockProcessOutput)>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

/// Scripted stand-in for the compiler and other external tools.
///
/// Commands are matched against expectations in the order they were added;
/// the first match wins. A command matching nothing, with no default set,
/// fails to "start" with `NotFound`.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Contains(substring.to_string()), output)
    }

    /// Add an expectation matched by regex.
    pub fn expect_regex(&self, pattern: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Regex(pattern.to_string()), output)
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.lock().default_output = Some(output);
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        self.lock().expectations.push((pattern, output));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Executor for MockExecutor {
    fn run(&self, cmd: &CommandSpec) -> io::Result<ProcessOutput> {
        let full_cmd = cmd.display();
        let mut state = self.lock();
        state.calls.push(full_cmd.clone());

        let matched = state
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&full_cmd))
            .map(|(_, output)| output.clone())
            .or_else(|| state.default_output.clone());

        match matched {
            Some(output) => Ok(output.into()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("unexpected command: {}", full_cmd),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tree_lists_nested_files() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/p/src/b.cpp", "");
        fs.add_file("/p/src/a/deep.cpp", "");
        fs.add_file("/p/other.cpp", "");

        assert!(fs.is_dir(Path::new("/p/src/a")));
        assert!(fs.is_file(Path::new("/p/other.cpp")));
        assert_eq!(
            fs.files(Path::new("/p/src")).unwrap(),
            vec![PathBuf::from("/p/src/a/deep.cpp"), PathBuf::from("/p/src/b.cpp")]
        );
    }

    #[test]
    fn test_mock_executor_matching() {
        let exec = MockExecutor::new();
        exec.expect("gcc --version", MockProcessOutput::success("gcc 13.2.0"))
            .expect_regex(r"^g\+\+ .*-shared", MockProcessOutput::failure(1, "ld error"));

        let out = exec.run(&CommandSpec::new("gcc").arg("--version")).unwrap();
        assert_eq!(out.stdout, "gcc 13.2.0");

        let out = exec
            .run(&CommandSpec::new("g++").args(["-shared", "-o", "m.so"]))
            .unwrap();
        assert_eq!(out.code, Some(1));

        assert!(exec.run(&CommandSpec::new("clang")).is_err());
        assert_eq!(exec.calls().len(), 3);
    }
}
