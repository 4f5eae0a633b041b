//! Native build driver.
//!
//! Compiles each source with the injected toolchain, links the objects into
//! one shared library, and places companion files next to it. Steps run one
//! at a time and the first failure stops the build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::context::BuildLayout;
use crate::builder::errors::BuildError;
use crate::builder::executor::{Executor, ProcessOutput};
use crate::builder::plan::{BuildPlan, CompileStep};
use crate::builder::toolchain::{CommandSpec, Toolchain};
use crate::core::artifact::ArtifactName;
use crate::core::descriptor::BuildDescriptor;

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Absolute path of the shared library
    pub artifact: PathBuf,
    pub name: ArtifactName,
    /// Number of sources compiled
    pub compiled: usize,
    /// Companion files copied next to the artifact
    pub companions: Vec<PathBuf>,
}

/// Drives a build with an explicit toolchain and executor.
pub struct Builder<'a> {
    toolchain: &'a dyn Toolchain,
    executor: &'a dyn Executor,
    verbose: bool,
}

impl<'a> Builder<'a> {
    pub fn new(toolchain: &'a dyn Toolchain, executor: &'a dyn Executor) -> Self {
        Builder {
            toolchain,
            executor,
            verbose: false,
        }
    }

    /// Log every command instead of showing a progress bar.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Compute the commands without running them.
    pub fn plan(&self, desc: &BuildDescriptor, layout: &BuildLayout) -> BuildPlan {
        BuildPlan::new(desc, layout, self.toolchain)
    }

    /// Compile, link and name the module described by `desc`.
    ///
    /// Fails before invoking the toolchain when there are no sources.
    pub fn build(
        &self,
        desc: &BuildDescriptor,
        layout: &BuildLayout,
    ) -> Result<BuildOutput, BuildError> {
        if desc.sources.is_empty() {
            return Err(BuildError::NoSources {
                module: desc.module_name.clone(),
            });
        }

        let plan = self.plan(desc, layout);
        self.execute(&plan, layout)
    }

    /// Run a previously computed plan.
    pub fn execute(&self, plan: &BuildPlan, layout: &BuildLayout) -> Result<BuildOutput, BuildError> {
        let start = Instant::now();

        create_dir(&layout.object_dir)?;
        create_dir(&layout.output_dir)?;

        let pb = self.progress_bar(plan.compile_count());
        for step in &plan.compile_steps {
            if let Some(ref pb) = pb {
                pb.set_message(display_name(&step.source));
            }
            let result = self.compile(step);
            if let Some(ref pb) = pb {
                match &result {
                    Ok(()) => pb.inc(1),
                    Err(_) => pb.abandon(),
                }
            }
            result?;
        }
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        self.link(plan)?;
        let companions = self.copy_companions(plan, &layout.output_dir)?;

        tracing::info!(
            "finished `{}` ({} file(s)) in {:.2}s",
            plan.artifact,
            plan.compile_count(),
            start.elapsed().as_secs_f64()
        );

        Ok(BuildOutput {
            artifact: plan.link.output.clone(),
            name: plan.artifact.clone(),
            compiled: plan.compile_count(),
            companions,
        })
    }

    fn compile(&self, step: &CompileStep) -> Result<(), BuildError> {
        if let Some(parent) = step.output.parent() {
            create_dir(parent)?;
        }

        tracing::debug!(
            "compiling {} -> {}",
            step.source.display(),
            step.output.display()
        );

        let output = self.run(&step.command)?;
        if !output.success() {
            return Err(BuildError::Compilation {
                source_file: step.source.clone(),
                command: step.command.display(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        Ok(())
    }

    fn link(&self, plan: &BuildPlan) -> Result<(), BuildError> {
        tracing::debug!(
            "linking {} object(s) -> {}",
            plan.link.objects.len(),
            plan.link.output.display()
        );

        let output = self.run(&plan.link.command)?;
        if !output.success() {
            return Err(BuildError::Link {
                output: plan.link.output.clone(),
                command: plan.link.command.display(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        if plan.artifact.was_renamed() {
            tracing::info!(
                "named artifact `{}` (toolchain convention: `{}`)",
                plan.artifact.final_name,
                plan.artifact.conventional
            );
        }

        Ok(())
    }

    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, BuildError> {
        if self.verbose {
            tracing::info!("running {}", cmd.display());
        }

        let output = self
            .executor
            .run(cmd)
            .map_err(|source| BuildError::Spawn {
                program: cmd.program.clone(),
                source,
            })?;

        // Warnings from a successful step still reach the user
        if output.success() && !output.stderr.trim().is_empty() {
            tracing::warn!("{}", output.stderr.trim_end());
        }

        Ok(output)
    }

    fn copy_companions(&self, plan: &BuildPlan, dest: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let mut copied = Vec::with_capacity(plan.companions.len());

        for file in &plan.companions {
            let name = file.file_name().ok_or_else(|| {
                BuildError::io(
                    file.clone(),
                    io::Error::new(io::ErrorKind::InvalidInput, "companion has no file name"),
                )
            })?;
            let target = dest.join(name);

            fs::copy(file, &target).map_err(|e| BuildError::io(file.clone(), e))?;
            tracing::debug!("copied {} -> {}", file.display(), target.display());
            copied.push(target);
        }

        Ok(copied)
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if self.verbose || total <= 1 {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::io(path, e))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::{GccToolchain, ToolchainPlatform};
    use crate::core::language::Language;
    use crate::core::workspace::Profile;
    use crate::sources::SourceFileList;
    use crate::test_support::{MockExecutor, MockProcessOutput};
    use tempfile::TempDir;

    fn gcc() -> GccToolchain {
        GccToolchain::new("gcc".into(), "g++".into(), ToolchainPlatform::Gcc)
    }

    fn descriptor(root: &Path, sources: &[&str]) -> BuildDescriptor {
        BuildDescriptor {
            module_name: "toolbox".to_string(),
            artifact_stem: "_toolbox".to_string(),
            language: Language::Cxx,
            standard: None,
            sources: SourceFileList::from(
                sources.iter().map(|s| root.join(s)).collect::<Vec<_>>(),
            ),
            include_dirs: vec![],
            defines: vec![],
            flags: vec![],
            ldflags: vec![],
            abi_suffix: Some(".cpython-311-x86_64-linux-gnu.so".to_string()),
            strip_suffix: true,
            companions: vec![],
        }
    }

    #[test]
    fn test_build_runs_compiles_then_link() {
        let tmp = TempDir::new().unwrap();
        let layout = BuildLayout::new(tmp.path(), tmp.path().join("out"), Profile::Debug);
        let desc = descriptor(tmp.path(), &["src/a.cpp", "src/b.cpp"]);

        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));

        let out = Builder::new(&gcc(), &exec).build(&desc, &layout).unwrap();

        let calls = exec.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("g++ -c"));
        assert!(calls[0].contains("src/a.cpp"));
        assert!(calls[1].contains("src/b.cpp"));
        assert!(calls[2].contains("-shared"));

        assert_eq!(out.compiled, 2);
        assert_eq!(out.name.final_name, "_toolbox.so");
        assert_eq!(out.artifact, tmp.path().join("out/_toolbox.so"));
        assert!(tmp.path().join("out/obj/src").is_dir());
    }

    #[test]
    fn test_compile_failure_stops_build() {
        let tmp = TempDir::new().unwrap();
        let layout = BuildLayout::new(tmp.path(), tmp.path().join("out"), Profile::Debug);
        let desc = descriptor(tmp.path(), &["src/a.cpp", "src/b.cpp"]);

        let exec = MockExecutor::new();
        exec.expect_contains("a.cpp", MockProcessOutput::failure(3, "a.cpp:1:1: error"));
        exec.set_default(MockProcessOutput::success(""));

        let err = Builder::new(&gcc(), &exec).build(&desc, &layout).unwrap_err();
        match err {
            BuildError::Compilation {
                ref source_file,
                code,
                ref stderr,
                ..
            } => {
                assert!(source_file.ends_with("src/a.cpp"));
                assert_eq!(code, Some(3));
                assert!(stderr.contains("error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.exit_code(), 3);
        // Nothing after the failing step ran
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn test_link_failure() {
        let tmp = TempDir::new().unwrap();
        let layout = BuildLayout::new(tmp.path(), tmp.path().join("out"), Profile::Release);
        let desc = descriptor(tmp.path(), &["src/a.cpp"]);

        let exec = MockExecutor::new();
        exec.expect_contains("-shared", MockProcessOutput::failure(1, "undefined reference"));
        exec.set_default(MockProcessOutput::success(""));

        let err = Builder::new(&gcc(), &exec).build(&desc, &layout).unwrap_err();
        assert!(matches!(err, BuildError::Link { code: Some(1), .. }));
    }

    #[test]
    fn test_no_sources_never_invokes_toolchain() {
        let tmp = TempDir::new().unwrap();
        let layout = BuildLayout::new(tmp.path(), tmp.path().join("out"), Profile::Debug);
        let desc = descriptor(tmp.path(), &[]);

        let exec = MockExecutor::new();
        let err = Builder::new(&gcc(), &exec).build(&desc, &layout).unwrap_err();
        assert!(matches!(err, BuildError::NoSources { .. }));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_spawn_failure() {
        let tmp = TempDir::new().unwrap();
        let layout = BuildLayout::new(tmp.path(), tmp.path().join("out"), Profile::Debug);
        let desc = descriptor(tmp.path(), &["src/a.cpp"]);

        // No expectations and no default: the mock refuses to start anything
        let exec = MockExecutor::new();
        let err = Builder::new(&gcc(), &exec).build(&desc, &layout).unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_companions_copied() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("toolbox.py"), "from _toolbox import *\n").unwrap();

        let layout = BuildLayout::new(tmp.path(), tmp.path().join("out"), Profile::Debug);
        let mut desc = descriptor(tmp.path(), &["src/a.cpp"]);
        desc.companions = vec![tmp.path().join("toolbox.py")];

        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));

        let out = Builder::new(&gcc(), &exec).build(&desc, &layout).unwrap();
        assert_eq!(out.companions, vec![tmp.path().join("out/toolbox.py")]);
        assert!(tmp.path().join("out/toolbox.py").is_file());
    }
}
