//! High-level operations behind the CLI commands.

pub mod extbuild_build;
pub mod extbuild_init;

pub use extbuild_build::{build, BuildOptions, BuildResult};
pub use extbuild_init::{init_project, module_name_for};
