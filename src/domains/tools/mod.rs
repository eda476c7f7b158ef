//! Tools domain module.
//!
//! This module turns MCP tool calls into Proxmox API requests. Every tool is a
//! row in a static table; one generic engine runs them all.
//!
//! ## Architecture
//!
//! - `spec.rs` - Declarative `ToolSpec` / `ParamSpec` / `Endpoint` types
//! - `definitions/` - The tool tables, one file per functional area
//! - `registry.rs` - Lookup and MCP schema rendering
//! - `binder.rs` - Argument validation
//! - `translator.rs` - Path, query and form construction
//! - `dispatch.rs` - Runs a tool against the Proxmox client
//! - `router.rs` - Dynamic ToolRouter builder for the stdio transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! Add a `ToolSpec` entry to the matching file in `definitions/`. Parameter
//! renames, defaults and allowed values are all table fields. No other file
//! needs to change.

mod binder;
pub mod definitions;
mod dispatch;
mod error;
mod registry;
mod result;
pub mod router;
pub mod spec;
mod translator;

pub use binder::{BoundArguments, bind};
pub use dispatch::ToolDispatcher;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use router::build_tool_router;
pub use spec::{Endpoint, ParamSpec, Route, ToolSpec};
pub use translator::{ApiRequest, translate};
