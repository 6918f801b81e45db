//! Domains module containing business logic organized by bounded contexts.
//!
//! - `repomix`: building, running and interpreting Repomix invocations
//! - `tools`: the MCP tools that expose Repomix to clients

pub mod repomix;
pub mod tools;
