//! Proxmox VE MCP Server Library
//!
//! This crate exposes a Proxmox VE cluster to MCP clients as a set of tools.
//! Each tool call becomes exactly one authenticated request against the
//! Proxmox API, and every request leaves one audit record.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling, the main server,
//!   the HTTP bearer gate and the transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **proxmox**: API client, envelope formatting, audit sinks
//!   - **tools**: Declarative tool catalog, argument binding, request translation, dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use proxmox_mcp_server::core::{Config, McpServer, TransportService};
//! use proxmox_mcp_server::domains::proxmox::{ProxmoxClient, TracingAuditSink};
//! use proxmox_mcp_server::domains::tools::ToolDispatcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.proxmox.validate()?;
//!
//!     let client = ProxmoxClient::new(&config.proxmox, Arc::new(TracingAuditSink))?;
//!     let server = McpServer::new(config.clone(), ToolDispatcher::new(Arc::new(client)));
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
