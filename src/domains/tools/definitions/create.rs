//! Guest creation and removal tools.

use crate::domains::tools::spec::{
    Endpoint, GUEST_TYPE, NODE, ParamSpec, Route, ToolSpec, VMID,
};

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "create_vm",
        description: "Create a new QEMU virtual machine",
        params: &[
            NODE,
            ParamSpec::optional("vmid", "VM ID (optional, auto-assigned if empty)", Route::Form),
            ParamSpec::optional("name", "VM name", Route::Form),
            ParamSpec::optional("memory", "Memory in MB (e.g. 2048)", Route::Form),
            ParamSpec::optional("cores", "Number of CPU cores", Route::Form),
            ParamSpec::optional("sockets", "Number of CPU sockets", Route::Form),
            ParamSpec::optional("cpu", "CPU type (e.g. host)", Route::Form),
            ParamSpec::optional("net0", "Network config (e.g. virtio,bridge=vmbr0)", Route::Form),
            ParamSpec::optional("scsi0", "SCSI disk (e.g. local-lvm:32)", Route::Form),
            ParamSpec::optional(
                "ide2",
                "IDE device, typically CD-ROM (e.g. local:iso/ubuntu.iso,media=cdrom)",
                Route::Form,
            ),
            ParamSpec::optional(
                "ostype",
                "OS type (e.g. l26 for Linux, win11 for Windows)",
                Route::Form,
            ),
            ParamSpec::optional("boot", "Boot order (e.g. order=scsi0;ide2;net0)", Route::Form),
        ],
        endpoint: Endpoint::post("/nodes/{node}/qemu"),
    },
    ToolSpec {
        name: "create_container",
        description: "Create a new LXC container",
        params: &[
            NODE,
            ParamSpec::optional(
                "vmid",
                "Container ID (optional, auto-assigned if empty)",
                Route::Form,
            ),
            ParamSpec::optional("hostname", "Container hostname", Route::Form),
            ParamSpec::required(
                "ostemplate",
                "OS template (e.g. local:vztmpl/debian-12-standard_12.2-1_amd64.tar.zst)",
                Route::Form,
            ),
            ParamSpec::optional("storage", "Storage for rootfs (e.g. local-lvm)", Route::Form),
            ParamSpec::optional("rootfs", "Root filesystem (e.g. local-lvm:8)", Route::Form),
            ParamSpec::optional("memory", "Memory in MB", Route::Form),
            ParamSpec::optional("swap", "Swap in MB", Route::Form),
            ParamSpec::optional("cores", "Number of CPU cores", Route::Form),
            ParamSpec::optional(
                "net0",
                "Network config (e.g. name=eth0,bridge=vmbr0,ip=dhcp)",
                Route::Form,
            ),
            ParamSpec::optional("password", "Root password", Route::Form),
            ParamSpec::optional("ssh_public_keys", "SSH public keys (URL encoded)", Route::Form)
                .renamed("ssh-public-keys"),
            ParamSpec::optional("unprivileged", "Unprivileged container (1 or 0)", Route::Form),
            ParamSpec::optional("start", "Start after creation (1 or 0)", Route::Form),
        ],
        endpoint: Endpoint::post("/nodes/{node}/lxc"),
    },
    ToolSpec {
        name: "clone_guest",
        description: "Clone an existing VM or container",
        params: &[
            NODE,
            ParamSpec::required("vmid", "Source VM/container ID", Route::Path),
            GUEST_TYPE,
            ParamSpec::required("newid", "New VM/container ID", Route::Form),
            ParamSpec::optional("name", "New name (or hostname for LXC)", Route::Form),
            ParamSpec::optional("full", "Full clone (1) or linked clone (0)", Route::Form),
            ParamSpec::optional("storage", "Target storage for the clone", Route::Form),
            ParamSpec::optional("target", "Target node for cross-node cloning", Route::Form),
        ],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/clone"),
    },
    ToolSpec {
        name: "delete_guest",
        description: "Delete a VM or container (must be stopped)",
        params: &[
            NODE,
            VMID,
            GUEST_TYPE,
            ParamSpec::optional("purge", "Purge from all configurations (1 or 0)", Route::Query),
            ParamSpec::optional(
                "destroy_unreferenced_disks",
                "Destroy unreferenced disks (1 or 0)",
                Route::Query,
            )
            .renamed("destroy-unreferenced-disks"),
        ],
        endpoint: Endpoint::delete("/nodes/{node}/{type}/{vmid}"),
    },
    ToolSpec {
        name: "convert_to_template",
        description: "Convert a VM or container to a template",
        params: &[NODE, VMID, GUEST_TYPE],
        endpoint: Endpoint::post("/nodes/{node}/{type}/{vmid}/template"),
    },
];
