//! Snapshot tools.

use crate::domains::tools::spec::{
    Endpoint, GUEST_TYPE, NODE, ParamSpec, Route, ToolSpec, VMID,
};

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_snapshots",
        description: "List all snapshots of a VM or container",
        params: &[NODE, VMID, GUEST_TYPE],
        endpoint: Endpoint::get("/nodes/{node}/{type}/{vmid}/snapshot"),
    },
    ToolSpec {
        name: "create_snapshot",
        description: "Create a snapshot of a VM or container",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::required("snapname", "Snapshot name", Route::Form),
            ParamSpec::optional("description", "Snapshot description", Route::Form),
        ],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/snapshot"),
    },
    ToolSpec {
        name: "rollback_snapshot",
        description: "Rollback a VM or container to a snapshot",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::required("snapname", "Snapshot name to rollback to", Route::Path),
        ],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/snapshot/{snapname}/rollback"),
    },
    ToolSpec {
        name: "delete_snapshot",
        description: "Delete a snapshot of a VM or container",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::required("snapname", "Snapshot name to delete", Route::Path),
        ],
        endpoint: Endpoint::delete("/nodes/{node}/{type}/{vmid}/snapshot/{snapname}"),
    },
];
