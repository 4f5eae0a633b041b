//! Core data structures for extbuild.
//!
//! - The manifest and the workspace built around it
//! - The build descriptor handed to the toolchain
//! - Artifact naming

pub mod artifact;
pub mod descriptor;
pub mod language;
pub mod manifest;
pub mod workspace;

pub use artifact::{strip_suffix, ArtifactName};
pub use descriptor::BuildDescriptor;
pub use language::{Language, Standard};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use workspace::{find_manifest, find_manifest_upward, Profile, Workspace};
