//! Declarative tool descriptions.
//!
//! A [`ToolSpec`] names a tool, lists its parameters and says how they map
//! onto one Proxmox API [`Endpoint`]. All specs are `'static` data defined in
//! `definitions/`.

use crate::domains::proxmox::HttpMethod;

/// Where a bound parameter value ends up in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Substituted verbatim into a `{name}` placeholder of the path template.
    Path,
    /// Substituted into the path template, percent-encoded.
    EscapedPath,
    /// Appended to the query string (omitted when empty).
    Query,
    /// Sent as a form field in the body (omitted when empty).
    Form,
}

/// One tool parameter. All parameter values are strings.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
    pub route: Route,
    /// Field name on the wire, when it differs from `name`.
    pub wire_name: Option<&'static str>,
    /// Accepted values. Empty means any string.
    pub allowed: &'static [&'static str],
}

impl ParamSpec {
    /// A required parameter.
    pub const fn required(name: &'static str, description: &'static str, route: Route) -> Self {
        Self {
            name,
            description,
            required: true,
            default: None,
            route,
            wire_name: None,
            allowed: &[],
        }
    }

    /// An optional parameter without a default.
    pub const fn optional(name: &'static str, description: &'static str, route: Route) -> Self {
        Self {
            name,
            description,
            required: false,
            default: None,
            route,
            wire_name: None,
            allowed: &[],
        }
    }

    /// Set the default used when the caller omits this parameter.
    ///
    /// An empty string from the caller also takes the default.
    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Send this parameter under a different field name.
    pub const fn renamed(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Restrict the parameter to a fixed set of values.
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    /// Name used in the query string or form body.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }
}

/// The Proxmox API call a tool maps to.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Path below `/api2/json` with `{param}` placeholders.
    pub path: &'static str,
    /// Query pairs always sent, ahead of any routed parameters.
    pub fixed_query: &'static [(&'static str, &'static str)],
    /// Reject the call when no query or form field was supplied.
    pub require_any_field: bool,
}

impl Endpoint {
    const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            fixed_query: &[],
            require_any_field: false,
        }
    }

    pub const fn get(path: &'static str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub const fn post(path: &'static str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub const fn put(path: &'static str) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub const fn delete(path: &'static str) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub const fn with_query(mut self, fixed_query: &'static [(&'static str, &'static str)]) -> Self {
        self.fixed_query = fixed_query;
        self
    }

    pub const fn requiring_any_field(mut self) -> Self {
        self.require_any_field = true;
        self
    }
}

/// A tool exposed to MCP clients.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub endpoint: Endpoint,
}

impl ToolSpec {
    /// Look up a parameter by exact name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

// ============================================================================
// Shared parameters
// ============================================================================

pub const GUEST_TYPES: &[&str] = &["qemu", "lxc"];

pub const NODE: ParamSpec = ParamSpec::required("node", "Node name", Route::Path);

pub const VMID: ParamSpec = ParamSpec::required("vmid", "VM/container ID", Route::Path);

pub const GUEST_TYPE: ParamSpec =
    ParamSpec::optional("type", "Guest type: qemu or lxc (default: qemu)", Route::Path)
        .with_default("qemu")
        .one_of(GUEST_TYPES);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name_defaults_to_name() {
        let p = ParamSpec::optional("ssh_public_keys", "keys", Route::Form);
        assert_eq!(p.wire_name(), "ssh_public_keys");
        assert_eq!(p.renamed("ssh-public-keys").wire_name(), "ssh-public-keys");
    }

    #[test]
    fn test_guest_type_defaults_to_qemu() {
        assert!(!GUEST_TYPE.required);
        assert_eq!(GUEST_TYPE.default, Some("qemu"));
        assert_eq!(GUEST_TYPE.allowed, GUEST_TYPES);
    }
}
