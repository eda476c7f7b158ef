//! Task introspection tools.

use crate::domains::tools::spec::{Endpoint, NODE, ParamSpec, Route, ToolSpec};

const UPID: ParamSpec = ParamSpec::required("upid", "Task UPID", Route::EscapedPath);

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_tasks",
        description: "List recent tasks on a node",
        params: &[
            NODE,
            ParamSpec::optional(
                "limit",
                "Max number of tasks to return (default: 10)",
                Route::Query,
            )
            .with_default("10"),
        ],
        endpoint: Endpoint::get("/nodes/{node}/tasks"),
    },
    ToolSpec {
        name: "get_task_status",
        description: "Get the status of a specific task by UPID",
        params: &[NODE, UPID],
        endpoint: Endpoint::get("/nodes/{node}/tasks/{upid}/status"),
    },
    ToolSpec {
        name: "get_task_log",
        description: "Get the log output of a specific task",
        params: &[NODE, UPID],
        endpoint: Endpoint::get("/nodes/{node}/tasks/{upid}/log"),
    },
];
