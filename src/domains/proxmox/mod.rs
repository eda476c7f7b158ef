//! Proxmox VE API domain.
//!
//! This module owns everything that talks to the remote control plane:
//!
//! - `client.rs` - authenticated HTTP client, one request per call
//! - `format.rs` - `{"data": ...}` envelope unwrapping and payload formatting
//! - `audit.rs` - audit records and sinks, one record per outbound call
//! - `error.rs` - client error types

pub mod audit;
mod client;
mod error;
pub mod format;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::{
    AuditRecord, AuditRotation, AuditSink, CompositeAuditSink, JsonFileAuditSink,
    RecordingAuditSink, TracingAuditSink,
};
pub use client::{API_PREFIX, ApiToken, HttpMethod, ProxmoxClient, encode_form, with_query};
pub use error::ClientError;
