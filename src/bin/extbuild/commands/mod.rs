//! Command implementations

pub mod build;
pub mod clean;
pub mod init;
pub mod name;
pub mod sources;
pub mod toolchain;
