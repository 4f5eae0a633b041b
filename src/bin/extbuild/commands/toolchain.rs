//! `extbuild toolchain` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ToolchainArgs;
use extbuild::builder::detect_toolchain_with;
use extbuild::core::Language;
use extbuild::util::process::ProcessBuilder;
use extbuild::util::GlobalContext;

pub fn execute(_args: ToolchainArgs, ctx: &GlobalContext) -> Result<()> {
    // Project config applies when run inside a project
    let root = ctx
        .find_manifest()
        .ok()
        .and_then(|m| m.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| ctx.cwd().to_path_buf());
    let config = ctx.config(&root);

    let toolchain = detect_toolchain_with(&config.toolchain)?;

    println!("Toolchain: {}", toolchain.platform().as_str());
    println!();
    for lang in [Language::C, Language::Cxx] {
        let compiler = toolchain.compiler_path(lang);
        println!("  {:<4} {}", lang.as_str(), compiler.display());
        if let Some(version) = first_version_line(compiler) {
            println!("       {}", version);
        }
    }
    println!();
    println!("  object extension:         .{}", toolchain.object_extension());
    println!("  shared library extension: .{}", toolchain.shared_lib_extension());

    let env: Vec<_> = ["CC", "CXX"]
        .iter()
        .filter_map(|var| std::env::var(var).ok().map(|v| format!("{}={}", var, v)))
        .collect();
    if !env.is_empty() {
        println!();
        println!("Environment:");
        for line in env {
            println!("  {}", line);
        }
    }

    Ok(())
}

fn first_version_line(compiler: &Path) -> Option<String> {
    let output = ProcessBuilder::new(compiler).arg("--version").exec().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.lines().next().map(|l| l.trim().to_string())
}
