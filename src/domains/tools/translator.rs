//! Request translation: bound arguments to one Proxmox API request.

use crate::domains::proxmox::HttpMethod;

use super::binder::BoundArguments;
use super::error::ToolError;
use super::spec::{Route, ToolSpec};

/// A fully resolved API request, ready for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below `/api2/json`, placeholders substituted, no query string.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

/// Build the API request for a tool from its bound arguments.
pub fn translate(spec: &ToolSpec, args: &BoundArguments) -> Result<ApiRequest, ToolError> {
    let endpoint = &spec.endpoint;
    let path = render_path(spec, args)?;

    let mut query: Vec<(String, String)> = endpoint
        .fixed_query
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut form = Vec::new();
    let mut supplied_fields = 0usize;

    for param in spec.params {
        let value = args.get(param.name).unwrap_or_default();
        if value.is_empty() {
            continue;
        }
        let pair = (param.wire_name().to_string(), value.to_string());
        match param.route {
            Route::Path | Route::EscapedPath => continue,
            Route::Query => query.push(pair),
            Route::Form => form.push(pair),
        }
        if !param.required {
            supplied_fields += 1;
        }
    }

    if endpoint.require_any_field && supplied_fields == 0 {
        return Err(ToolError::NoFields);
    }

    Ok(ApiRequest {
        method: endpoint.method,
        path,
        query,
        form,
    })
}

/// Substitute `{name}` placeholders in the endpoint path.
fn render_path(spec: &ToolSpec, args: &BoundArguments) -> Result<String, ToolError> {
    let template = spec.endpoint.path;
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| ToolError::Template {
            template,
            placeholder: after.to_string(),
        })?;
        let name = &after[..close];

        let missing = || ToolError::Template {
            template,
            placeholder: name.to_string(),
        };
        let param = spec.param(name).ok_or_else(missing)?;
        let value = args.get(name).ok_or_else(missing)?;

        match param.route {
            Route::EscapedPath => out.push_str(&urlencoding::encode(value)),
            _ => out.push_str(value),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
