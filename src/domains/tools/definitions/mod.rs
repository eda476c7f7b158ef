//! Tool definitions, one file per functional area.
//!
//! Each file exports a `TOOLS` table of [`ToolSpec`](super::spec::ToolSpec)
//! entries. The registry lists them in the order declared here.

pub mod backup;
pub mod cluster;
pub mod create;
pub mod guest;
pub mod snapshot;
pub mod storage;
pub mod task;
