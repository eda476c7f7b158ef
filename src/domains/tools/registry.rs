//! Tool Registry - the static catalog of Proxmox tools.
//!
//! This module provides:
//! - Lookup of a [`ToolSpec`] by name
//! - Rendering of every spec as an MCP [`Tool`] with a JSON Schema input

use std::sync::{Arc, OnceLock};

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};

use super::definitions::{backup, cluster, create, guest, snapshot, storage, task};
use super::spec::ToolSpec;

/// Functional groups, in listing order.
const GROUPS: &[&[ToolSpec]] = &[
    cluster::TOOLS,
    guest::TOOLS,
    create::TOOLS,
    snapshot::TOOLS,
    backup::TOOLS,
    storage::TOOLS,
    task::TOOLS,
];

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - read-only view over the tool catalog.
pub struct ToolRegistry;

impl ToolRegistry {
    /// All tool specs, grouped by functional area.
    pub fn all() -> &'static [ToolSpec] {
        static ALL: OnceLock<Vec<ToolSpec>> = OnceLock::new();
        ALL.get_or_init(|| GROUPS.iter().flat_map(|g| g.iter().copied()).collect())
    }

    /// Look up a tool by exact name.
    pub fn get(name: &str) -> Option<&'static ToolSpec> {
        Self::all().iter().find(|spec| spec.name == name)
    }

    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        Self::all().iter().map(|spec| spec.name).collect()
    }

    /// Get all tools as Tool models (metadata), in catalog order.
    pub fn get_all_tools() -> Vec<Tool> {
        Self::all().iter().map(Self::to_tool).collect()
    }

    /// Render one spec as an MCP tool.
    pub fn to_tool(spec: &ToolSpec) -> Tool {
        Tool {
            name: spec.name.into(),
            description: Some(spec.description.into()),
            input_schema: Arc::new(input_schema(spec)),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// JSON Schema for a tool's arguments. Every parameter is a string.
fn input_schema(spec: &ToolSpec) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut required = Vec::new();

    for param in spec.params {
        let mut property = JsonObject::new();
        property.insert("type".into(), json!("string"));
        property.insert("description".into(), json!(param.description));
        if let Some(default) = param.default {
            property.insert("default".into(), json!(default));
        }
        if !param.allowed.is_empty() {
            property.insert("enum".into(), json!(param.allowed));
        }
        properties.insert(param.name.into(), Value::Object(property));

        if param.required {
            required.push(param.name);
        }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    schema
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domains::tools::spec::Route;

    #[test]
    fn test_registry_tool_names() {
        let names = ToolRegistry::tool_names();
        assert_eq!(names.len(), 32);
        assert!(names.contains(&"get_cluster_status"));
        assert!(names.contains(&"start_guest"));
        assert!(names.contains(&"update_guest_config"));
        assert!(names.contains(&"create_container"));
        assert!(names.contains(&"rollback_snapshot"));
        assert!(names.contains(&"restore_backup"));
        assert!(names.contains(&"download_template"));
        assert!(names.contains(&"get_task_log"));
    }

    #[test]
    fn test_tool_names_are_unique() {
        let names = ToolRegistry::tool_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_param_names_unique_within_tool() {
        for spec in ToolRegistry::all() {
            let unique: HashSet<_> = spec.params.iter().map(|p| p.name).collect();
            assert_eq!(unique.len(), spec.params.len(), "{}", spec.name);
        }
    }

    #[test]
    fn test_required_params_have_no_default() {
        for spec in ToolRegistry::all() {
            for param in spec.params.iter().filter(|p| p.required) {
                assert!(
                    param.default.is_none(),
                    "{}.{} is required but has a default",
                    spec.name,
                    param.name
                );
            }
        }
    }

    #[test]
    fn test_path_placeholders_match_path_params() {
        for spec in ToolRegistry::all() {
            for param in spec.params {
                let placeholder = format!("{{{}}}", param.name);
                let in_path = spec.endpoint.path.contains(&placeholder);
                let routed_to_path = matches!(param.route, Route::Path | Route::EscapedPath);
                assert_eq!(in_path, routed_to_path, "{}.{}", spec.name, param.name);
            }
        }
    }

    #[test]
    fn test_get_unknown_is_none() {
        assert!(ToolRegistry::get("start_guest").is_some());
        assert!(ToolRegistry::get("Start_Guest").is_none());
        assert!(ToolRegistry::get("reboot_cluster").is_none());
    }

    #[test]
    fn test_schema_required_and_enum() {
        let tool = ToolRegistry::to_tool(ToolRegistry::get("stop_guest").unwrap());
        let schema = Value::Object((*tool.input_schema).clone());

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["node", "vmid"]));
        assert_eq!(schema["properties"]["type"]["default"], "qemu");
        assert_eq!(schema["properties"]["type"]["enum"], json!(["qemu", "lxc"]));
        assert_eq!(
            schema["properties"]["action"]["enum"],
            json!(["stop", "shutdown", "reboot"])
        );
        assert_eq!(schema["properties"]["node"]["type"], "string");
    }

    #[test]
    fn test_schema_without_params_has_no_required() {
        let tool = ToolRegistry::to_tool(ToolRegistry::get("list_nodes").unwrap());
        assert!(!tool.input_schema.contains_key("required"));
        assert_eq!(tool.description.as_deref().map(|d| !d.is_empty()), Some(true));
    }
}
