//! extbuild CLI - build native extension modules from C/C++ source trees

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use extbuild::util::GlobalContext;
use extbuild::BuildError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);

        // Compiler and linker failures exit with the tool's own code
        let code = e
            .downcast_ref::<BuildError>()
            .map(BuildError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("extbuild=debug")
    } else {
        EnvFilter::new("extbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?.with_manifest_path(cli.manifest_path);
    ctx.set_verbose(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx),
        Commands::Sources(args) => commands::sources::execute(args, &ctx),
        Commands::Name(args) => commands::name::execute(args, &ctx),
        Commands::Clean(args) => commands::clean::execute(args, &ctx),
        Commands::Init(args) => commands::init::execute(args, &ctx),
        Commands::Toolchain(args) => commands::toolchain::execute(args, &ctx),
    }
}
