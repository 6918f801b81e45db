//! Repomix domain module.
//!
//! Everything needed to turn a tool request into a Repomix run and back:
//!
//! - `options.rs` - packing options shared by all tools (tri-state flags)
//! - `command.rs` - pure composition of the argument list
//! - `runner.rs` - child process execution with bounded capture
//! - `executor.rs` - result normalization into tool results
//! - `error.rs` - failure taxonomy

pub mod command;
mod error;
pub mod executor;
pub mod options;
pub mod runner;

pub use command::{CommandSpec, Destination, InvocationMode, compose, resolve_output_path};
pub use error::RepomixError;
pub use executor::{ExecutionOutcome, RepomixExecutor};
pub use options::{OutputFormat, PackOptions};
pub use runner::{CapturedOutput, CommandRunner, ProcessRunner};
