//! Implementation of `extbuild build`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::{
    detect_toolchain_with, query_interpreter, BuildError, BuildLayout, BuildOutput, BuildPlan,
    Builder, Executor, ProcessExecutor,
};
use crate::core::descriptor::BuildDescriptor;
use crate::core::workspace::Workspace;
use crate::sources::DiskTree;
use crate::util::config::Config;
use crate::util::context::GlobalContext;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build in release mode
    pub release: bool,

    /// Emit compile_commands.json
    pub emit_compile_commands: bool,

    /// Compute the plan and stop before running anything
    pub emit_plan: bool,

    /// ABI suffix overriding the manifest and interpreter
    pub suffix: Option<String>,

    /// Log every command
    pub verbose: bool,
}

/// Result of a build.
#[derive(Debug)]
pub enum BuildResult {
    /// `--plan`: nothing was run
    Planned(BuildPlan),
    Built(BuildOutput),
}

/// Build the extension module for the workspace `ctx` points at.
pub fn build(ctx: &GlobalContext, opts: &BuildOptions) -> Result<BuildResult> {
    let (ws, config) = ctx.workspace(opts.release)?;
    let executor = ProcessExecutor;

    let desc = describe(&ws, &config, opts, &executor)?;

    let toolchain = detect_toolchain_with(&config.toolchain)?;
    tracing::debug!(
        "toolchain {} ({})",
        toolchain.platform().as_str(),
        toolchain.compiler_path(desc.language).display()
    );

    let layout = BuildLayout::from_workspace(&ws);
    let builder = Builder::new(toolchain.as_ref(), &executor).verbose(opts.verbose);
    let plan = builder.plan(&desc, &layout);

    if opts.emit_compile_commands || config.build.emit_compile_commands {
        let path = compile_commands_path(&ws);
        plan.emit_compile_commands(ws.root(), &path)?;
    }

    if opts.emit_plan {
        return Ok(BuildResult::Planned(plan));
    }

    if desc.sources.is_empty() {
        return Err(BuildError::NoSources {
            module: desc.module_name,
        }
        .into());
    }

    let output = builder.execute(&plan, &layout)?;
    Ok(BuildResult::Built(output))
}

/// Gather everything the build needs from the manifest, config, command line
/// and interpreter.
pub fn describe(
    ws: &Workspace,
    config: &Config,
    opts: &BuildOptions,
    executor: &dyn Executor,
) -> Result<BuildDescriptor> {
    let manifest = ws.manifest();
    let tree = DiskTree::new().follow_links(manifest.sources.follow_links);

    let mut desc = BuildDescriptor::from_workspace(ws, &tree)
        .map_err(BuildError::from)?
        .with_abi_suffix(opts.suffix.clone());
    desc.prepend_flags(&config.toolchain.cflags, &config.toolchain.ldflags);

    if let Some(ref interpreter) = manifest.artifact.interpreter {
        let info = query_interpreter(executor, Path::new(interpreter))?;
        if desc.abi_suffix.is_none() {
            desc.abi_suffix = info.ext_suffix;
        }
        if let Some(dir) = info.include_dir {
            desc.add_include_dir(dir);
        }
    }

    Ok(desc)
}

/// Where `compile_commands.json` is written.
pub fn compile_commands_path(ws: &Workspace) -> PathBuf {
    ws.target_dir().join("compile_commands.json")
}
