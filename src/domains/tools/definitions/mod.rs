//! Tool definitions module.
//!
//! Each tool lives in its own file and knows how to describe itself, route
//! itself for rmcp and answer HTTP calls.

pub mod codebase;

pub use codebase::{
    GetCodebaseParams, GetCodebaseTool, GetRemoteCodebaseParams, GetRemoteCodebaseTool,
    SaveCodebaseParams, SaveCodebaseTool,
};
