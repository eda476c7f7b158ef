//! Domains module containing business logic organized by bounded contexts.
//!
//! - **proxmox**: the Proxmox VE API client, response formatting and auditing
//! - **tools**: the tool catalog and the engine that maps tool calls onto
//!   Proxmox API requests

pub mod proxmox;
pub mod tools;
