//! Tool dispatch: registry lookup, binding, translation and execution.
//!
//! The dispatcher is the single entry point transports use to run a tool. It
//! turns every failure below the lookup into an error-flagged [`ToolResult`],
//! so remote API errors never reach the protocol error channel.

use std::sync::Arc;

use rmcp::model::JsonObject;
use tracing::{debug, instrument, warn};

use crate::domains::proxmox::{ClientError, HttpMethod, ProxmoxClient, with_query};

use super::binder::bind;
use super::error::ToolError;
use super::registry::ToolRegistry;
use super::result::ToolResult;
use super::spec::ToolSpec;
use super::translator::{ApiRequest, translate};

/// Runs tools against a shared Proxmox client.
#[derive(Clone)]
pub struct ToolDispatcher {
    client: Arc<ProxmoxClient>,
}

impl ToolDispatcher {
    pub fn new(client: Arc<ProxmoxClient>) -> Self {
        Self { client }
    }

    /// Run a tool by name.
    ///
    /// Only an unknown tool name is an `Err`. Everything else, including
    /// invalid arguments and remote failures, is an error-flagged result.
    pub async fn call(&self, name: &str, args: &JsonObject) -> Result<ToolResult, ToolError> {
        let Some(spec) = ToolRegistry::get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };
        Ok(self.dispatch(spec, args).await)
    }

    /// Run one tool invocation to completion.
    #[instrument(skip_all, fields(tool = spec.name))]
    pub async fn dispatch(&self, spec: &ToolSpec, args: &JsonObject) -> ToolResult {
        let request = match bind(spec, args).and_then(|bound| translate(spec, &bound)) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected arguments: {}", e);
                return ToolResult::error(e.to_string());
            }
        };

        match self.execute(&request).await {
            Ok(text) => ToolResult::success(text),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    async fn execute(&self, request: &ApiRequest) -> Result<String, ClientError> {
        let client = &self.client;
        match request.method {
            HttpMethod::Get => client.get(&with_query(&request.path, &request.query)?).await,
            HttpMethod::Post => {
                let path = with_query(&request.path, &request.query)?;
                client.post(&path, &request.form).await
            }
            HttpMethod::Put => {
                let path = with_query(&request.path, &request.query)?;
                client.put(&path, &request.form).await
            }
            HttpMethod::Delete => client.delete(&request.path, &request.query).await,
        }
    }
}
