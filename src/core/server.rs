//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the tool router.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//!
//! ## Client IP
//!
//! Tools that report or geolocate the caller need its address. The server
//! carries an optional client IP that is captured into the router; TCP
//! connections get their own copy through [`McpServer::with_client_ip`].

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::debug;

use super::config::Config;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Address of the connected client, when the transport knows it.
    client_ip: Option<String>,

    /// HTTP client shared by every upstream adapter (one connection pool).
    http: reqwest::Client,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let http = reqwest::Client::new();

        Self {
            tool_router: build_tool_router::<Self>(config.clone(), http.clone(), None),
            config,
            client_ip: None,
            http,
        }
    }

    /// Return a server bound to one client address.
    ///
    /// The router is rebuilt so every tool route sees `client_ip`; the HTTP
    /// client is carried over, so connections keep sharing one pool.
    pub fn with_client_ip(self, client_ip: impl Into<String>) -> Self {
        let client_ip = client_ip.into();
        debug!("Binding server instance to client {}", client_ip);

        Self {
            tool_router: build_tool_router::<Self>(
                self.config.clone(),
                self.http.clone(),
                Some(client_ip.clone()),
            ),
            config: self.config,
            client_ip: Some(client_ip),
            http: self.http,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration (for tool access).
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Client address this instance is bound to, if any.
    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// The HTTP transport resolves the caller per request, so the address is
    /// passed in rather than taken from the instance.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        client_ip: Option<&str>,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.config.clone(), self.http.clone());
        registry.call_tool(name, arguments, client_ip).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Utility tools: evaluate math expressions, report the caller's IP address and \
                 its geolocation, and look up current weather or a 5-day forecast for a city, \
                 coordinates, or the caller's location."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
