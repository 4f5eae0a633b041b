//! C/C++ extension module builder.
//!
//! Turns a [`BuildDescriptor`](crate::core::BuildDescriptor) into compile
//! and link commands for the detected toolchain, and runs them.

pub mod context;
pub mod errors;
pub mod executor;
pub mod native;
pub mod plan;
pub mod python;
pub mod toolchain;

pub use context::BuildLayout;
pub use errors::BuildError;
pub use executor::{Executor, ProcessExecutor, ProcessOutput};
pub use native::{BuildOutput, Builder};
pub use plan::BuildPlan;
pub use python::{query_interpreter, InterpreterError, InterpreterInfo};
pub use toolchain::{
    detect_toolchain_with, CommandSpec, GccToolchain, MsvcToolchain, Toolchain,
    ToolchainPlatform,
};
