//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;

use super::ToolError;
use super::definitions::{
    ArithmeticTool, CalculateTool, GetIpDataTool, GetIpTool, GetWeatherForecastTool,
    GetWeatherTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub struct ToolRegistry {
    config: Arc<Config>,
    http: reqwest::Client,
}

impl ToolRegistry {
    /// Create a new tool registry on top of the server's HTTP client.
    pub fn new(config: Arc<Config>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            CalculateTool::NAME,
            ArithmeticTool::NAME,
            GetIpTool::NAME,
            GetIpDataTool::NAME,
            GetWeatherTool::NAME,
            GetWeatherForecastTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for tool metadata on the HTTP
    /// transport; STDIO/TCP list the same tools through the router.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            CalculateTool::to_tool(),
            ArithmeticTool::to_tool(),
            GetIpTool::to_tool(),
            GetIpDataTool::to_tool(),
            GetWeatherTool::to_tool(),
            GetWeatherForecastTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// `client_ip` is the caller's address as seen by the HTTP transport.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        client_ip: Option<&str>,
    ) -> Result<serde_json::Value, String> {
        match name {
            CalculateTool::NAME => CalculateTool::http_handler(arguments),
            ArithmeticTool::NAME => ArithmeticTool::http_handler(arguments),
            GetIpTool::NAME => GetIpTool::http_handler(client_ip),
            GetIpDataTool::NAME => {
                GetIpDataTool::http_handler(arguments, self.config.clone(), &self.http, client_ip)
                    .await
            }
            GetWeatherTool::NAME => {
                GetWeatherTool::http_handler(arguments, self.config.clone(), &self.http, client_ip)
                    .await
            }
            GetWeatherForecastTool::NAME => {
                GetWeatherForecastTool::http_handler(
                    arguments,
                    self.config.clone(),
                    &self.http,
                    client_ip,
                )
                .await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(Config::default()), reqwest::Client::new())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = test_registry();
        let names = registry.tool_names();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"calculate"));
        assert!(names.contains(&"arithmetic"));
        assert!(names.contains(&"get_ip"));
        assert!(names.contains(&"get_ip_data"));
        assert!(names.contains(&"get_weather"));
        assert!(names.contains(&"get_weather_forecast"));
    }

    #[test]
    fn test_metadata_matches_names() {
        let registry = test_registry();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), registry.tool_names().len());
        for tool in tools {
            assert!(registry.tool_names().contains(&tool.name.as_ref()));
            assert!(tool.description.is_some());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_calculate() {
        let registry = test_registry();
        let result = registry
            .call_tool("calculate", serde_json::json!({ "expression": "2 + 3 * 4" }), None)
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "14");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_get_ip_uses_client_ip() {
        let registry = test_registry();
        let result = registry
            .call_tool("get_ip", serde_json::json!({}), Some("198.51.100.4"))
            .await
            .unwrap();
        assert_eq!(result["content"][0]["text"], "198.51.100.4");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_weather_without_key() {
        let registry = test_registry();
        let result = registry
            .call_tool("get_weather", serde_json::json!({ "location": "Oslo" }), None)
            .await
            .unwrap();
        assert_eq!(result["isError"], true);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = test_registry();
        let result = registry.call_tool("unknown", serde_json::json!({}), None).await;
        assert_eq!(result.unwrap_err(), "Tool not found: unknown");
    }
}
