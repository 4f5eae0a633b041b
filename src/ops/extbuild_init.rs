//! Implementation of `extbuild init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::{Manifest, MANIFEST_NAME};

/// Determine the module name from an explicit name or the directory.
pub fn module_name_for(name: Option<&str>, path: &Path) -> String {
    if let Some(name) = name {
        return name.to_string();
    }

    // `.` has no file name; use the directory it resolves to
    let dir = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    dir.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("module")
        .replace(['-', '.', ' '], "_")
}

/// Write a starter `Extension.toml` (and a source file) into `path`.
pub fn init_project(path: &Path, name: &str) -> Result<()> {
    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    let contents = Manifest::template(name);
    // Reject bad names before touching the filesystem
    Manifest::parse(&contents).with_context(|| format!("invalid module name `{}`", name))?;

    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))?;
    fs::write(&manifest_path, contents)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    let src_dir = path.join("src");
    fs::create_dir_all(&src_dir).context("failed to create src directory")?;
    fs::create_dir_all(path.join("include")).context("failed to create include directory")?;

    let source = src_dir.join(format!("{}.cpp", name));
    if !source.exists() {
        fs::write(
            &source,
            format!(
                r#"// {name} extension module

extern "C" int {name}_version() {{
    return 1;
}}
"#
            ),
        )?;
    }

    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "# extbuild output\n.extbuild/\n")?;
    }

    tracing::debug!("initialized `{}` in {}", name, path.display());
    Ok(())
}
