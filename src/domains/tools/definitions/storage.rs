//! Storage, ISO and container template tools.

use crate::domains::tools::spec::{Endpoint, NODE, ParamSpec, Route, ToolSpec};

const STORAGE_OR_LOCAL: ParamSpec =
    ParamSpec::optional("storage", "Storage name (default: local)", Route::Path)
        .with_default("local");

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_storage",
        description: "List storage pools on a node",
        params: &[NODE],
        endpoint: Endpoint::get("/nodes/{node}/storage"),
    },
    ToolSpec {
        name: "list_templates",
        description: "List available container templates on a storage",
        params: &[NODE, STORAGE_OR_LOCAL],
        endpoint: Endpoint::get("/nodes/{node}/storage/{storage}/content")
            .with_query(&[("content", "vztmpl")]),
    },
    ToolSpec {
        name: "list_isos",
        description: "List available ISO images on a storage",
        params: &[NODE, STORAGE_OR_LOCAL],
        endpoint: Endpoint::get("/nodes/{node}/storage/{storage}/content")
            .with_query(&[("content", "iso")]),
    },
    ToolSpec {
        name: "download_template",
        description: "Download a container template from the Proxmox repository",
        params: &[
            NODE,
            ParamSpec::required("storage", "Target storage (e.g. local)", Route::Form),
            ParamSpec::required(
                "template",
                "Template name (e.g. debian-12-standard_12.2-1_amd64.tar.zst)",
                Route::Form,
            ),
        ],
        endpoint: Endpoint::post("/nodes/{node}/aplinfo"),
    },
];
