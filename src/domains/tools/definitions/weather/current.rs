//! Current weather tool.

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
use crate::domains::tools::common::success_result;
use crate::domains::tools::definitions::network::{GeolocationLookup, IpApiClient};

use super::format::format_current;
use super::model::WeatherReport;
use super::query::Endpoint;
use super::service::fetch_for_location;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters shared by the weather tools.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WeatherParams {
    /// City name or "lat,lon"; the client's IP location is used when omitted.
    #[serde(default)]
    #[schemars(
        description = "Location to get weather for (optional). Can be city name (e.g., 'London' or 'New York,US') or coordinates (e.g., '40.7128,-74.0060'). Uses client IP location if not provided."
    )]
    pub location: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Current weather tool.
pub struct GetWeatherTool;

impl GetWeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get current weather for a location. Uses client's IP location by default, or accepts a custom location parameter (city name or 'lat,lon' coordinates)";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(location = ?params.location))]
    pub async fn execute(
        params: &WeatherParams,
        config: &Config,
        http: &reqwest::Client,
        geolocation: &dyn GeolocationLookup,
        client_ip: Option<&str>,
    ) -> CallToolResult {
        info!("Weather tool called");

        let fetched = fetch_for_location::<WeatherReport>(
            config,
            http,
            geolocation,
            Endpoint::Current,
            params.location.as_deref(),
            client_ip,
        )
        .await;

        match fetched {
            Ok((report, resolved)) => success_result(format_current(
                &report,
                Some(&resolved.label),
                resolved.units,
            )),
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
        let params = WeatherParams {
            location: crate::domains::tools::common::optional_string_arg(&arguments, "location"),
        };

        let geolocation = IpApiClient::new(http.clone(), &config.geolocation);
        let result = Self::execute(&params, &config, http, &geolocation, client_ip).await;
        Ok(crate::domains::tools::common::http_result(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<WeatherParams>(),
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
        let geolocation = IpApiClient::new(http.clone(), &config.geolocation);
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            let http = http.clone();
            let geolocation = geolocation.clone();
            let client_ip = client_ip.clone();
            async move {
                let params: WeatherParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config, &http, &geolocation, client_ip.as_deref()).await)
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
    use crate::domains::tools::ToolError;
    use crate::domains::tools::common::result_text;
    use crate::domains::tools::definitions::network::GeolocationResult;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FailingLookup;

    #[async_trait]
    impl GeolocationLookup for FailingLookup {
        async fn lookup(&self, _ip: &str) -> Result<GeolocationResult, ToolError> {
            Err(ToolError::upstream_status("failed to get IP data from service"))
        }
    }

    fn params(location: Option<&str>) -> WeatherParams {
        WeatherParams {
            location: location.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_error_result() {
        let result = GetWeatherTool::execute(
            &params(Some("London")),
            &Config::default(),
            &reqwest::Client::new(),
            &FailingLookup,
            None,
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("OpenWeatherMap API key not configured."));
    }

    #[tokio::test]
    async fn test_no_location_and_no_client_ip() {
        let result = GetWeatherTool::execute(
            &params(None),
            &Config::with_api_key("k"),
            &reqwest::Client::new(),
            &FailingLookup,
            None,
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Could not determine client IP address");
    }

    #[tokio::test]
    async fn test_geolocation_failure_is_wrapped() {
        let result = GetWeatherTool::execute(
            &params(None),
            &Config::with_api_key("k"),
            &reqwest::Client::new(),
            &FailingLookup,
            Some("192.168.1.10"),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "Failed to get location from IP: failed to get IP data from service"
        );
    }

    #[tokio::test]
    async fn test_renders_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "New York,US"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coord": {"lat": 40.7143, "lon": -74.006},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "main": {"temp": 68.2, "feels_like": 67.1, "temp_min": 68.2, "temp_max": 68.2, "pressure": 1020, "humidity": 40},
                "visibility": 10000,
                "wind": {"speed": 5.7, "deg": 90},
                "clouds": {"all": 0},
                "sys": {"country": "US"},
                "name": "New York",
                "cod": 200
            })))
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("k");
        config.weather.api_base_url = server.uri();

        let result = GetWeatherTool::execute(
            &params(Some("New York,US")),
            &config,
            &reqwest::Client::new(),
            &FailingLookup,
            None,
        )
        .await;
        let text = result_text(&result);

        assert!(!result.is_error.unwrap_or(false));
        assert!(text.starts_with("# Weather Information: New York\n\n*Requested location: New York,US*\n\n"));
        assert!(text.contains("- **Condition:** Clear Sky (Clear)\n"));
        assert!(text.contains("- **Temperature:** 68.2°F (feels like 67.1°F)\n"));
        assert!(!text.contains("**Range:**"));
        assert!(text.contains("- **Wind:** 5.7 mph E (90°)\n"));
        assert!(!text.contains("**Cloudiness:**"));
    }

    #[test]
    fn test_schema_has_optional_location() {
        let tool = GetWeatherTool::to_tool();
        assert_eq!(tool.name, "get_weather");
        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("location").is_some());
    }
}
