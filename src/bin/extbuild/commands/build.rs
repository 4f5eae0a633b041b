//! `extbuild build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use extbuild::ops::{build, BuildOptions, BuildResult};
use extbuild::util::GlobalContext;

pub fn execute(args: BuildArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = BuildOptions {
        release: args.release,
        emit_compile_commands: args.emit_compile_commands,
        emit_plan: args.plan,
        suffix: args.suffix,
        verbose: ctx.is_verbose(),
    };

    match build(ctx, &opts)? {
        BuildResult::Planned(plan) => {
            println!("{}", plan.to_json()?);
        }
        BuildResult::Built(output) => {
            eprintln!(
                "    Finished `{}` -> {}",
                output.name,
                output.artifact.display()
            );
            for companion in &output.companions {
                eprintln!("      Copied {}", companion.display());
            }
        }
    }

    Ok(())
}
