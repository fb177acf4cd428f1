//! Client IP tool.
//!
//! Returns the IP address of the client making the request.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::ToolError;
use crate::domains::tools::common::{non_empty, success_result};

/// The get_ip tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetIpParams {}

/// Client IP tool.
pub struct GetIpTool;

impl GetIpTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_ip";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the IP address of the client making the request";

    /// Execute the tool logic.
    pub fn execute(client_ip: Option<&str>) -> CallToolResult {
        match non_empty(client_ip) {
            Some(ip) => {
                info!("Reporting client IP {}", ip);
                success_result(ip.to_string())
            }
            None => ToolError::MissingClientIp.into_call_result(),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(client_ip: Option<&str>) -> Result<serde_json::Value, String> {
        Ok(crate::domains::tools::common::http_result(Self::execute(
            client_ip,
        )))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetIpParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(client_ip: Option<String>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |_ctx: ToolCallContext<'_, S>| {
            let client_ip = client_ip.clone();
            async move { Ok::<_, McpError>(Self::execute(client_ip.as_deref())) }.boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::common::result_text;

    #[test]
    fn test_returns_client_ip() {
        let result = GetIpTool::execute(Some("203.0.113.7"));
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result_text(&result), "203.0.113.7");
    }

    #[test]
    fn test_missing_client_ip_is_error() {
        for ip in [None, Some("")] {
            let result = GetIpTool::execute(ip);
            assert_eq!(result.is_error, Some(true));
            assert_eq!(result_text(&result), "Could not determine client IP address");
        }
    }
}
