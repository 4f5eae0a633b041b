//! `extbuild clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use extbuild::util::fs::remove_dir_all_if_exists;
use extbuild::util::GlobalContext;

pub fn execute(_args: CleanArgs, ctx: &GlobalContext) -> Result<()> {
    let (ws, _config) = ctx.workspace(false)?;
    let target_dir = ws.target_dir();

    if remove_dir_all_if_exists(target_dir)? {
        eprintln!("     Removed {}", target_dir.display());
    } else {
        eprintln!("     Nothing to clean");
    }

    Ok(())
}
