//! Cluster introspection tools.

use crate::domains::tools::spec::{Endpoint, NODE, ToolSpec};

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "get_cluster_status",
        description: "Get Proxmox cluster status including nodes and quorum info",
        params: &[],
        endpoint: Endpoint::get("/cluster/status"),
    },
    ToolSpec {
        name: "list_nodes",
        description: "List all nodes in the Proxmox cluster with status, CPU, and memory usage",
        params: &[],
        endpoint: Endpoint::get("/nodes"),
    },
    ToolSpec {
        name: "get_node_status",
        description: "Get detailed status of a specific Proxmox node",
        params: &[NODE],
        endpoint: Endpoint::get("/nodes/{node}/status"),
    },
];
