//! `extbuild sources` command

use anyhow::Result;

use crate::cli::SourcesArgs;
use extbuild::core::BuildDescriptor;
use extbuild::sources::DiskTree;
use extbuild::util::GlobalContext;
use extbuild::BuildError;

pub fn execute(_args: SourcesArgs, ctx: &GlobalContext) -> Result<()> {
    let (ws, _config) = ctx.workspace(false)?;
    let tree = DiskTree::new().follow_links(ws.manifest().sources.follow_links);

    let desc = BuildDescriptor::from_workspace(&ws, &tree).map_err(BuildError::from)?;
    for path in &desc.sources {
        println!("{}", path.display());
    }

    Ok(())
}
