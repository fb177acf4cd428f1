//! 5-day weather forecast tool.

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

use super::format::format_forecast;
use super::model::ForecastReport;
use super::query::Endpoint;
use super::service::fetch_for_location;

/// Parameters for the forecast tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ForecastParams {
    #[serde(default)]
    #[schemars(
        description = "Location to get forecast for (optional). Can be city name (e.g., 'London' or 'New York,US') or coordinates (e.g., '40.7128,-74.0060'). Uses client IP location if not provided."
    )]
    pub location: Option<String>,
}

/// Forecast tool.
pub struct GetWeatherForecastTool;

impl GetWeatherForecastTool {
    pub const NAME: &'static str = "get_weather_forecast";

    pub const DESCRIPTION: &'static str = "Get 5-day weather forecast for a location. Uses client's IP location by default, or accepts a custom location parameter (city name or 'lat,lon' coordinates)";

    #[instrument(skip_all, fields(location = ?params.location))]
    pub async fn execute(
        params: &ForecastParams,
        config: &Config,
        http: &reqwest::Client,
        geolocation: &dyn GeolocationLookup,
        client_ip: Option<&str>,
    ) -> CallToolResult {
        info!("Forecast tool called");

        let fetched = fetch_for_location::<ForecastReport>(
            config,
            http,
            geolocation,
            Endpoint::Forecast,
            params.location.as_deref(),
            client_ip,
        )
        .await;

        match fetched {
            Ok((report, resolved)) => {
                info!(samples = report.list.len(), "Forecast received");
                success_result(format_forecast(
                    &report,
                    Some(&resolved.label),
                    resolved.units,
                ))
            }
            Err(e) => e.into_call_result(),
        }
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
        http: &reqwest::Client,
        client_ip: Option<&str>,
    ) -> Result<serde_json::Value, String> {
        let params = ForecastParams {
            location: crate::domains::tools::common::optional_string_arg(&arguments, "location"),
        };

        let geolocation = IpApiClient::new(http.clone(), &config.geolocation);
        let result = Self::execute(&params, &config, http, &geolocation, client_ip).await;
        Ok(crate::domains::tools::common::http_result(result))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ForecastParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

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
                let params: ForecastParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config, &http, &geolocation, client_ip.as_deref()).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;
    use crate::domains::tools::common::result_text;
    use crate::domains::tools::definitions::network::GeolocationResult;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Valencia;

    #[async_trait]
    impl GeolocationLookup for Valencia {
        async fn lookup(&self, _ip: &str) -> Result<GeolocationResult, ToolError> {
            Ok(GeolocationResult {
                status: "success".to_string(),
                city: "Valencia".to_string(),
                country: "Spain".to_string(),
                country_code: "ES".to_string(),
                lat: 39.4699,
                lon: -0.3763,
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_error_result() {
        let result = GetWeatherForecastTool::execute(
            &ForecastParams::default(),
            &Config::default(),
            &reqwest::Client::new(),
            &Valencia,
            Some("1.2.3.4"),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("OPENWEATHER_API_KEY"));
    }

    #[tokio::test]
    async fn test_ip_fallback_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "39.4699"))
            .and(query_param("lon", "-0.3763"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cod": "200",
                "cnt": 2,
                "list": [
                    {
                        "dt": 1705312800,
                        "main": {"temp": 16.0, "temp_min": 15.0, "temp_max": 17.0},
                        "weather": [{"main": "Clear", "description": "clear sky"}],
                        "pop": 0
                    },
                    {
                        "dt": 1705323600,
                        "main": {"temp": 14.0, "temp_min": 13.5, "temp_max": 14.5},
                        "weather": [{"main": "Rain", "description": "light rain"}],
                        "pop": 0.3,
                        "rain": {"3h": 0.4}
                    }
                ],
                "city": {
                    "name": "Valencia",
                    "coord": {"lat": 39.4699, "lon": -0.3763},
                    "country": "ES",
                    "timezone": 3600
                }
            })))
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("k");
        config.weather.api_base_url = server.uri();

        let result = GetWeatherForecastTool::execute(
            &ForecastParams::default(),
            &config,
            &reqwest::Client::new(),
            &Valencia,
            Some("81.0.0.1"),
        )
        .await;
        let text = result_text(&result);

        assert!(!result.is_error.unwrap_or(false));
        assert!(text.starts_with(
            "# Weather Forecast: Valencia\n\n*Requested location: Valencia, Spain*\n\n"
        ));
        // 10:00 and 13:00 UTC rendered at UTC+1.
        assert!(text.contains("**Mon 11:00 AM**: 16.0°C, Clear Sky\n"));
        assert!(text.contains("**Mon 2:00 PM**: 14.0°C, Light Rain (30% chance rain)\n"));
        assert!(text.contains("**Mon Jan 15**: 13.5°C - 17.0°C, Clear, 30% chance precipitation\n"));
        assert!(text.ends_with("- **City:** Valencia, ES\n- **Coordinates:** 39.4699, -0.3763\n"));
    }
}
