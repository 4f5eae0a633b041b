//! extbuild - build native extension modules from C/C++ source trees
//!
//! The library is split along the three stages of a build:
//! [`sources`] collects the files to compile, [`builder`] drives the
//! external toolchain, and [`core::artifact`] names the produced module.
//! [`ops`] ties them together for the command-line tool.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for extbuild unit tests.
///
/// Only compiled for tests. Provides an in-memory source tree and a
/// scripted process executor.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildError, Builder};
pub use core::{
    artifact::strip_suffix, descriptor::BuildDescriptor, manifest::Manifest, workspace::Workspace,
};
pub use sources::{collect_sources, ExtensionFilter, SourceFileList};
pub use util::context::GlobalContext;
