//! Guest lifecycle tools: listing, power state, configuration, migration.

use crate::domains::tools::spec::{
    Endpoint, GUEST_TYPE, NODE, ParamSpec, Route, ToolSpec, VMID,
};

const STOP_ACTIONS: &[&str] = &["stop", "shutdown", "reboot"];

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_vms",
        description: "List all QEMU virtual machines on a node",
        params: &[NODE],
        endpoint: Endpoint::get("/nodes/{node}/qemu"),
    },
    ToolSpec {
        name: "list_containers",
        description: "List all LXC containers on a node",
        params: &[NODE],
        endpoint: Endpoint::get("/nodes/{node}/lxc"),
    },
    ToolSpec {
        name: "list_cluster_resources",
        description: "List all VMs and containers across the entire cluster",
        params: &[],
        endpoint: Endpoint::get("/cluster/resources").with_query(&[("type", "vm")]),
    },
    ToolSpec {
        name: "get_guest_config",
        description: "Get the configuration of a VM or container (disk layout, NIC config, boot order, etc.)",
        params: &[NODE, VMID, GUEST_TYPE],
        endpoint: Endpoint::get("/nodes/{node}/{type}/{vmid}/config"),
    },
    ToolSpec {
        name: "start_guest",
        description: "Start a VM or container",
        params: &[NODE, VMID, GUEST_TYPE],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/status/start"),
    },
    ToolSpec {
        name: "stop_guest",
        description: "Stop, shutdown, or reboot a VM or container",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::optional(
                "action",
                "Action: stop, shutdown, or reboot (default: shutdown)",
                Route::Path,
            )
            .with_default("shutdown")
            .one_of(STOP_ACTIONS),
        ],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/status/{action}"),
    },
    ToolSpec {
        name: "get_next_id",
        description: "Get the next available VMID in the cluster",
        params: &[],
        endpoint: Endpoint::get("/cluster/nextid"),
    },
    ToolSpec {
        name: "update_guest_config",
        description: "Update the configuration of a VM or container (memory, CPU, network, etc.)",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::optional("memory", "Memory in MB", Route::Form),
            ParamSpec::optional("cores", "Number of CPU cores", Route::Form),
            ParamSpec::optional("sockets", "Number of CPU sockets", Route::Form),
            ParamSpec::optional("cpu", "CPU type (e.g. host, kvm64)", Route::Form),
            ParamSpec::optional("net0", "Network device configuration", Route::Form),
            ParamSpec::optional("name", "VM/container name", Route::Form),
            ParamSpec::optional("description", "Description/notes", Route::Form),
            ParamSpec::optional("boot", "Boot order (e.g. order=scsi0;net0)", Route::Form),
            ParamSpec::optional("onboot", "Start at boot: 1 or 0", Route::Form),
        ],
        endpoint: Endpoint::put("/nodes/{node}/{type}/{vmid}/config").requiring_any_field(),
    },
    ToolSpec {
        name: "migrate_guest",
        description: "Migrate a VM or container to another node",
        params: &[
            ParamSpec::required("node", "Source node name", Route::Path),
            VMID,
            GUEST_TYPE,
            ParamSpec::required("target", "Target node name", Route::Form),
            ParamSpec::optional("online", "Live migration: 1 or 0 (default: 0)", Route::Form),
        ],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/migrate"),
    },
    ToolSpec {
        name: "resize_guest_disk",
        description: "Resize a disk of a VM or container",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::required("disk", "Disk name (e.g. scsi0, virtio0, rootfs)", Route::Form),
            ParamSpec::required("size", "New size or increment (e.g. +10G, 50G)", Route::Form),
        ],
        endpoint: Endpoint::put("/nodes/{node}/{type}/{vmid}/resize"),
    },
];
