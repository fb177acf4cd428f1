//! IP geolocation adapter.
//!
//! Resolves an IP address to approximate location and network fields using
//! an ip-api.com compatible endpoint (`GET {base}/json/{ip}`).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::config::GeolocationConfig;
use crate::domains::tools::ToolError;

/// Geolocation record for one IP address.
///
/// Missing fields deserialize to empty/zero values; only `status` decides
/// whether the lookup succeeded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeolocationResult {
    pub query: String,
    pub status: String,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    #[serde(rename = "as")]
    pub autonomous_system: String,
}

impl GeolocationResult {
    /// Whether the provider reported a successful lookup.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Render the record as a markdown report.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("# IP Address Information: {}\n\n", self.query));

        out.push_str("## Location\n");
        out.push_str(&format!(
            "- **Country:** {} ({})\n",
            self.country, self.country_code
        ));
        out.push_str(&format!(
            "- **Region:** {} ({})\n",
            self.region_name, self.region
        ));
        out.push_str(&format!("- **City:** {}\n", self.city));
        if !self.zip.is_empty() {
            out.push_str(&format!("- **ZIP Code:** {}\n", self.zip));
        }
        out.push_str(&format!(
            "- **Coordinates:** {:.4}, {:.4}\n",
            self.lat, self.lon
        ));
        out.push_str(&format!("- **Timezone:** {}\n\n", self.timezone));

        out.push_str("## Network Information\n");
        out.push_str(&format!("- **ISP:** {}\n", self.isp));
        out.push_str(&format!("- **Organization:** {}\n", self.org));
        out.push_str(&format!("- **AS:** {}\n", self.autonomous_system));

        out
    }
}

/// Anything that can resolve an IP address to a geolocation record.
#[async_trait]
pub trait GeolocationLookup: Send + Sync {
    /// Look up `ip`. A non-success provider status is an error.
    async fn lookup(&self, ip: &str) -> Result<GeolocationResult, ToolError>;
}

/// ip-api.com client.
#[derive(Debug, Clone)]
pub struct IpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    /// Build an adapter on top of an existing (shared) HTTP client.
    pub fn new(client: reqwest::Client, config: &GeolocationConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GeolocationLookup for IpApiClient {
    #[instrument(skip(self))]
    async fn lookup(&self, ip: &str) -> Result<GeolocationResult, ToolError> {
        let url = format!("{}/json/{}", self.base_url, ip);
        debug!("Fetching IP geolocation from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ToolError::upstream_fetch(format!("failed to fetch IP data: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::upstream_fetch(format!("failed to read response: {}", e)))?;

        let data: GeolocationResult = serde_json::from_str(&body)
            .map_err(|e| ToolError::malformed_payload(format!("failed to parse response: {}", e)))?;

        if !data.is_success() {
            return Err(ToolError::upstream_status(
                "failed to get IP data from service",
            ));
        }

        debug!(
            city = %data.city,
            country_code = %data.country_code,
            "IP geolocation resolved"
        );
        Ok(data)
    }
}
