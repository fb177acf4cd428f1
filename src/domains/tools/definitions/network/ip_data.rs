//! IP geolocation tool.
//!
//! Looks up an explicit IP address, or the calling client's address, and
//! renders the geolocation record as markdown.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::domains::tools::ToolError;
use crate::domains::tools::common::{non_empty, success_result};

use super::geolocation::{GeolocationLookup, IpApiClient};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the IP data tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetIpDataParams {
    /// IP address to look up; the client IP is used when omitted.
    #[serde(default)]
    #[schemars(description = "IP address to lookup (optional, uses client IP if not provided)")]
    pub ip: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// IP geolocation tool.
pub struct GetIpDataTool;

impl GetIpDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_ip_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get detailed information about the client's IP address including geolocation data";

    /// Execute the tool logic against the given geolocation provider.
    #[instrument(skip_all, fields(ip = ?params.ip))]
    pub async fn execute(
        params: &GetIpDataParams,
        geolocation: &dyn GeolocationLookup,
        client_ip: Option<&str>,
    ) -> CallToolResult {
        info!("IP data tool called");

        let target = match non_empty(params.ip.as_deref()).or(non_empty(client_ip)) {
            Some(ip) => ip,
            None => return ToolError::MissingClientIp.into_call_result(),
        };

        match geolocation.lookup(target).await {
            Ok(data) => success_result(data.to_markdown()),
            Err(e) => e.into_call_result(),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
        http: &reqwest::Client,
        client_ip: Option<&str>,
    ) -> Result<serde_json::Value, String> {
        let params = GetIpDataParams {
            ip: crate::domains::tools::common::optional_string_arg(&arguments, "ip"),
        };

        let geolocation = IpApiClient::new(http.clone(), &config.geolocation);
        let result = Self::execute(&params, &geolocation, client_ip).await;
        Ok(crate::domains::tools::common::http_result(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetIpDataParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(
        config: Arc<Config>,
        http: reqwest::Client,
        client_ip: Option<String>,
    ) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        let geolocation = IpApiClient::new(http, &config.geolocation);
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let geolocation = geolocation.clone();
            let client_ip = client_ip.clone();
            async move {
                let params: GetIpDataParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &geolocation, client_ip.as_deref()).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::common::result_text;
    use crate::domains::tools::definitions::network::GeolocationResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the looked-up IP and answers with a fixed record.
    #[derive(Default)]
    struct RecordingLookup {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GeolocationLookup for RecordingLookup {
        async fn lookup(&self, ip: &str) -> Result<GeolocationResult, ToolError> {
            self.seen.lock().unwrap().push(ip.to_string());
            Ok(GeolocationResult {
                query: ip.to_string(),
                status: "success".to_string(),
                city: "Berlin".to_string(),
                country: "Germany".to_string(),
                country_code: "DE".to_string(),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_explicit_ip_wins_over_client_ip() {
        let lookup = RecordingLookup::default();
        let params = GetIpDataParams {
            ip: Some("1.2.3.4".to_string()),
        };
        let result = GetIpDataTool::execute(&params, &lookup, Some("5.6.7.8")).await;

        assert!(!result.is_error.unwrap_or(false));
        assert!(result_text(&result).starts_with("# IP Address Information: 1.2.3.4"));
        assert_eq!(*lookup.seen.lock().unwrap(), vec!["1.2.3.4".to_string()]);
    }

    #[tokio::test]
    async fn test_falls_back_to_client_ip() {
        let lookup = RecordingLookup::default();
        let params = GetIpDataParams { ip: Some(String::new()) };
        let result = GetIpDataTool::execute(&params, &lookup, Some("5.6.7.8")).await;

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(*lookup.seen.lock().unwrap(), vec!["5.6.7.8".to_string()]);
    }

    #[tokio::test]
    async fn test_no_ip_at_all_is_error() {
        let lookup = RecordingLookup::default();
        let result = GetIpDataTool::execute(&GetIpDataParams::default(), &lookup, None).await;

        assert_eq!(result.is_error, Some(true));
        assert!(lookup.seen.lock().unwrap().is_empty());
    }
}
