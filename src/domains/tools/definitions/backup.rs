//! Backup (vzdump) and restore tools.

use crate::domains::tools::spec::{Endpoint, NODE, ParamSpec, Route, ToolSpec};

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "backup_guest",
        description: "Create a backup (vzdump) of a VM or container",
        params: &[
            NODE,
            ParamSpec::required("vmid", "VM/container ID", Route::Form),
            ParamSpec::optional("storage", "Target storage for backup (e.g. local)", Route::Form),
            ParamSpec::optional("mode", "Backup mode: snapshot, suspend, or stop", Route::Form),
            ParamSpec::optional(
                "compress",
                "Compression: zstd, lzo, gzip, or 0 for none",
                Route::Form,
            ),
        ],
        endpoint: Endpoint::post("/nodes/{node}/vzdump"),
    },
    ToolSpec {
        name: "list_backups",
        description: "List backup files on a storage",
        params: &[
            NODE,
            ParamSpec::required("storage", "Storage name (e.g. local)", Route::Path),
        ],
        endpoint: Endpoint::get("/nodes/{node}/storage/{storage}/content")
            .with_query(&[("content", "backup")]),
    },
    ToolSpec {
        name: "restore_backup",
        description: "Restore a VM from a backup archive",
        params: &[
            NODE,
            ParamSpec::required("vmid", "Target VM ID for the restored VM", Route::Form),
            ParamSpec::required(
                "archive",
                "Backup archive path (e.g. local:backup/vzdump-qemu-100-2024_01_01-12_00_00.vma.zst)",
                Route::Form,
            ),
            ParamSpec::optional("storage", "Target storage for restored disks", Route::Form),
        ],
        endpoint: Endpoint::post("/nodes/{node}/qemu"),
    },
];
