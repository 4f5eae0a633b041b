//! `extbuild name` command

use anyhow::{Context, Result};

use crate::cli::NameArgs;
use extbuild::strip_suffix;
use extbuild::util::GlobalContext;

pub fn execute(args: NameArgs, ctx: &GlobalContext) -> Result<()> {
    let suffix = match args.suffix {
        Some(suffix) => suffix,
        None => manifest_suffix(ctx)?
            .context("no suffix given; pass --suffix or set `artifact.suffix` in Extension.toml")?,
    };

    println!("{}", strip_suffix(&args.filename, &suffix));
    Ok(())
}

fn manifest_suffix(ctx: &GlobalContext) -> Result<Option<String>> {
    let (ws, _config) = ctx.workspace(false)?;
    Ok(ws.manifest().artifact.suffix.clone())
}
