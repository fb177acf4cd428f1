//! Tool Router - builds the rmcp ToolRouter for STDIO/TCP transport.
//!
//! Each tool knows how to create its own route. Tools that need the caller's
//! address capture `client_ip` when the router is built, so a router is
//! built per connection on transports that know the peer.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::{
    ArithmeticTool, CalculateTool, GetIpDataTool, GetIpTool, GetWeatherForecastTool,
    GetWeatherTool,
};

/// Build the tool router with all registered tools.
///
/// Every upstream adapter is built on a clone of `http`, so all routes share
/// one connection pool.
pub fn build_tool_router<S>(
    config: Arc<Config>,
    http: reqwest::Client,
    client_ip: Option<String>,
) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(CalculateTool::create_route())
        .with_route(ArithmeticTool::create_route())
        .with_route(GetIpTool::create_route(client_ip.clone()))
        .with_route(GetIpDataTool::create_route(
            config.clone(),
            http.clone(),
            client_ip.clone(),
        ))
        .with_route(GetWeatherTool::create_route(
            config.clone(),
            http.clone(),
            client_ip.clone(),
        ))
        .with_route(GetWeatherForecastTool::create_route(config, http, client_ip))
}
