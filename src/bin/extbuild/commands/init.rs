//! `extbuild init` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::InitArgs;
use extbuild::ops::{init_project, module_name_for};
use extbuild::util::GlobalContext;

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = match args.path {
        Some(p) if p.is_absolute() => p,
        Some(p) => ctx.cwd().join(p),
        None => ctx.cwd().to_path_buf(),
    };

    let name = module_name_for(args.name.as_deref(), &path);
    init_project(&path, &name)?;

    eprintln!(
        "     Created `{}` in {}",
        name,
        display_dir(&path, ctx).display()
    );
    Ok(())
}

fn display_dir(path: &std::path::Path, ctx: &GlobalContext) -> PathBuf {
    let rel = extbuild::util::fs::relative_path(ctx.cwd(), path);
    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel
    }
}
