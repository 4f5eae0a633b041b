//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// extbuild - build native extension modules from C/C++ source trees
#[derive(Parser)]
#[command(name = "extbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to Extension.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile and link the extension module
    Build(BuildArgs),

    /// List the source files a build would compile
    Sources(SourcesArgs),

    /// Show the final name for an artifact file name
    Name(NameArgs),

    /// Remove build output
    Clean(CleanArgs),

    /// Write a starter Extension.toml
    Init(InitArgs),

    /// Show the detected toolchain
    Toolchain(ToolchainArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build in release mode
    #[arg(short, long)]
    pub release: bool,

    /// Emit build plan as JSON (no build)
    #[arg(long)]
    pub plan: bool,

    /// Emit compile_commands.json
    #[arg(long)]
    pub emit_compile_commands: bool,

    /// ABI suffix, overriding the manifest and interpreter
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,
}

#[derive(Args)]
pub struct SourcesArgs {}

#[derive(Args)]
pub struct NameArgs {
    /// Artifact file name as the toolchain produced it
    pub filename: String,

    /// Suffix to strip (defaults to the manifest's `artifact.suffix`)
    #[arg(long, value_name = "SUFFIX", env = "EXTBUILD_SUFFIX")]
    pub suffix: Option<String>,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Module name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ToolchainArgs {}
