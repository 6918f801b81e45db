//! Tools domain module.
//!
//! Tools are the functions MCP clients call. This server exposes three of
//! them, all backed by Repomix: `getCodebase`, `getRemoteCodebase` and
//! `saveCodebase`.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Tool listing and HTTP dispatch
//! - `error.rs` - Tool-specific error types

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
