//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered [`ToolSpec`] gets one dynamic route. All routes share the
//! same dispatcher, so the router holds no per-tool logic.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};
use tracing::info;

use super::dispatch::ToolDispatcher;
use super::registry::ToolRegistry;
use super::spec::ToolSpec;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(dispatcher: ToolDispatcher) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRegistry::all()
        .iter()
        .fold(ToolRouter::new(), |router, spec| {
            router.with_route(create_route(spec, dispatcher.clone()))
        })
}

/// Create a ToolRoute for one spec.
///
/// The dispatch future is raced against the request's cancellation token.
/// Dropping it aborts the outbound call.
fn create_route<S>(spec: &'static ToolSpec, dispatcher: ToolDispatcher) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(ToolRegistry::to_tool(spec), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let ct = ctx.request_context.ct.clone();
        let dispatcher = dispatcher.clone();
        async move {
            tokio::select! {
                result = dispatcher.dispatch(spec, &args) => Ok(result.into()),
                _ = ct.cancelled() => {
                    info!("Tool call cancelled: {}", spec.name);
                    Err(McpError::internal_error("request cancelled", None))
                }
            }
        }
        .boxed()
    })
}
