//! Toolchain detection functions.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use which::which;

use crate::util::config::ToolchainSettings;
use crate::util::process::ProcessBuilder;

use super::{GccToolchain, MsvcToolchain, Toolchain, ToolchainPlatform};

/// Detect the available toolchain.
///
/// Tries, in order:
/// 1. Compilers named in the `[toolchain]` config section
/// 2. Environment variables (CC, CXX)
/// 3. On Windows: cl.exe and link.exe from a developer prompt
/// 4. On Unix-like systems: c++/g++/clang++ and cc/gcc/clang on PATH
pub fn detect_toolchain_with(settings: &ToolchainSettings) -> Result<Box<dyn Toolchain>> {
    if settings.has_overrides() {
        if let Some(toolchain) = try_detect_from_config(settings)? {
            return Ok(toolchain);
        }
    }

    if let Some(toolchain) = try_detect_from_env()? {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_msvc()? {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_gcc()? {
        return Ok(toolchain);
    }

    bail!(
        "no C/C++ compiler found\n\
         \n\
         extbuild requires a compiler (g++, clang++, or cl).\n\
         Set the CXX environment variable, add a [toolchain] section to\n\
         .extbuild/config.toml, or install a compiler."
    )
}

/// Resolve a configured program: an existing path, or a name on PATH.
fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.exists() {
        return Some(program.to_path_buf());
    }
    which(program).ok()
}

/// Try to create a toolchain from config file settings.
fn try_detect_from_config(settings: &ToolchainSettings) -> Result<Option<Box<dyn Toolchain>>> {
    let cc = settings.cc.as_deref().and_then(|cc| {
        let resolved = resolve_program(cc);
        if resolved.is_none() {
            tracing::warn!("Configured C compiler not found: {}", cc.display());
        }
        resolved
    });
    let cxx = settings.cxx.as_deref().and_then(|cxx| {
        let resolved = resolve_program(cxx);
        if resolved.is_none() {
            tracing::warn!("Configured C++ compiler not found: {}", cxx.display());
        }
        resolved
    });

    let (cc, cxx) = match (cc, cxx) {
        (Some(cc), Some(cxx)) => (cc, cxx),
        (Some(cc), None) => {
            let cxx = GccToolchain::infer_cxx(&cc);
            (cc, cxx)
        }
        // Only a C++ compiler given: use it for C as well
        (None, Some(cxx)) => (cxx.clone(), cxx),
        (None, None) => return Ok(None),
    };

    if is_msvc(&cxx) {
        let link = which("link").unwrap_or_else(|_| PathBuf::from("link"));
        tracing::info!("Using MSVC from config: cl={}", cxx.display());
        return Ok(Some(Box::new(MsvcToolchain::new(cxx, link))));
    }

    let family = detect_compiler_family(&cxx);
    tracing::info!(
        "Using toolchain from config: cc={}, cxx={}",
        cc.display(),
        cxx.display()
    );

    Ok(Some(Box::new(GccToolchain::new(cc, cxx, family))))
}

/// Try CC / CXX from the environment.
fn try_detect_from_env() -> Result<Option<Box<dyn Toolchain>>> {
    let settings = ToolchainSettings {
        cc: std::env::var_os("CC").map(PathBuf::from),
        cxx: std::env::var_os("CXX").map(PathBuf::from),
        ..ToolchainSettings::default()
    };

    if !settings.has_overrides() {
        return Ok(None);
    }

    tracing::debug!("Trying compilers from CC/CXX environment variables");
    try_detect_from_config(&settings)
}

fn is_msvc(compiler: &Path) -> bool {
    compiler
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("cl"))
        .unwrap_or(false)
}

/// Try to detect MSVC from an already-configured developer prompt.
#[cfg(target_os = "windows")]
fn try_detect_msvc() -> Result<Option<Box<dyn Toolchain>>> {
    let Ok(cl) = which("cl") else {
        return Ok(None);
    };

    if std::env::var("INCLUDE").is_err() || std::env::var("LIB").is_err() {
        tracing::debug!("cl.exe found but INCLUDE/LIB are not set; run from a developer prompt");
        return Ok(None);
    }

    let link = which("link")
        .map_err(|_| anyhow::anyhow!("MSVC cl.exe found but link.exe not in PATH"))?;

    Ok(Some(Box::new(MsvcToolchain::new(cl, link))))
}

#[cfg(not(target_os = "windows"))]
fn try_detect_msvc() -> Result<Option<Box<dyn Toolchain>>> {
    Ok(None)
}

/// Try to detect GCC/Clang on PATH.
fn try_detect_gcc() -> Result<Option<Box<dyn Toolchain>>> {
    let cxx = match which("c++")
        .or_else(|_| which("g++"))
        .or_else(|_| which("clang++"))
    {
        Ok(p) => p,
        Err(_) => return Ok(None),
    };

    let cc = which("cc")
        .or_else(|_| which("gcc"))
        .or_else(|_| which("clang"))
        .unwrap_or_else(|_| cxx.clone());

    let family = detect_compiler_family(&cxx);

    Ok(Some(Box::new(GccToolchain::new(cc, cxx, family))))
}

/// Detect whether the compiler is GCC, Clang, or Apple Clang.
fn detect_compiler_family(compiler: &Path) -> ToolchainPlatform {
    let name = compiler
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if name.contains("g++") || name.contains("gcc") {
        return ToolchainPlatform::Gcc;
    }

    let version = ProcessBuilder::new(compiler)
        .arg("--version")
        .exec()
        .map(|out| String::from_utf8_lossy(&out.stdout).to_lowercase())
        .unwrap_or_default();

    family_from_version(&name, &version)
}

fn family_from_version(name: &str, version: &str) -> ToolchainPlatform {
    if version.contains("apple") && version.contains("clang") {
        ToolchainPlatform::AppleClang
    } else if version.contains("clang") || name.contains("clang") {
        ToolchainPlatform::Clang
    } else {
        ToolchainPlatform::Gcc
    }
}
