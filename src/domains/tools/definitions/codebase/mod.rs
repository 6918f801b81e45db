//! Repomix-backed codebase tools.

mod common;
pub mod get_codebase;
pub mod get_remote_codebase;
pub mod save_codebase;

pub use common::DEFAULT_OUTPUT_FILE;
pub use get_codebase::{GetCodebaseParams, GetCodebaseTool};
pub use get_remote_codebase::{GetRemoteCodebaseParams, GetRemoteCodebaseTool};
pub use save_codebase::{SaveCodebaseParams, SaveCodebaseTool};
