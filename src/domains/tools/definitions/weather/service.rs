//! Weather request pipeline.
//!
//! API key check, location resolution, provider fetch, payload parsing.
//! Every failure comes back as a [`ToolError`]; the tools turn it into an
//! error result.

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::network::GeolocationLookup;

use super::location::{LocationResolver, ResolvedLocation};
use super::query::{Endpoint, build_url};

/// Message returned when no OpenWeatherMap key is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "OpenWeatherMap API key not configured. Please set \
     OPENWEATHER_API_KEY environment variable. Get your free API key at \
     https://openweathermap.org/api";

/// OpenWeatherMap client bound to one API key.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Build a client from configuration; fails if the API key is absent.
    ///
    /// `http` is the server's shared connection pool.
    pub fn from_config(config: &Config, http: &reqwest::Client) -> Result<Self, ToolError> {
        let api_key = config
            .credentials
            .weather_api_key()
            .ok_or_else(|| ToolError::missing_configuration(MISSING_API_KEY_MESSAGE))?;

        Ok(Self {
            client: http.clone(),
            base_url: config.weather.api_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch and parse one endpoint for a resolved location.
    #[instrument(skip_all, fields(endpoint = endpoint.path(), units = location.units.as_param()))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        location: &ResolvedLocation,
    ) -> Result<T, ToolError> {
        let url = build_url(
            &self.base_url,
            endpoint,
            &location.query,
            location.units,
            &self.api_key,
        );
        debug!("Requesting {} from weather provider", endpoint.path());

        let response = self.client.get(&url).send().await.map_err(|e| {
            ToolError::upstream_fetch(format!("failed to fetch weather data: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ToolError::upstream_fetch(format!("failed to read weather response: {}", e))
        })?;

        if status != reqwest::StatusCode::OK {
            return Err(ToolError::upstream_status(format!(
                "weather API error (status {}): {}",
                status.as_u16(),
                body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ToolError::malformed_payload(format!("Failed to parse weather response: {}", e))
        })
    }
}

/// Run a full weather request: key check, then resolution, then fetch.
///
/// Returns the parsed payload together with the resolved location, whose
/// label and unit system the formatter needs.
pub async fn fetch_for_location<T: DeserializeOwned>(
    config: &Config,
    http: &reqwest::Client,
    geolocation: &dyn GeolocationLookup,
    endpoint: Endpoint,
    location: Option<&str>,
    client_ip: Option<&str>,
) -> Result<(T, ResolvedLocation), ToolError> {
    let client = WeatherClient::from_config(config, http)?;
    let resolved = LocationResolver::new(geolocation)
        .resolve(location, client_ip)
        .await?;

    info!("Fetching {} for {}", endpoint.path(), resolved.label);
    let payload = client.fetch(endpoint, &resolved).await?;
    Ok((payload, resolved))
}
