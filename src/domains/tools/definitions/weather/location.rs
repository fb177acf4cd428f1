//! Location resolution for weather lookups.
//!
//! Decides what to ask the weather provider for (a place name or a
//! coordinate pair) and which unit system to request, either from explicit
//! location text or from the geolocation of the client's IP address.

use std::fmt;

use tracing::{debug, info};

use crate::domains::tools::ToolError;
use crate::domains::tools::common::non_empty;
use crate::domains::tools::definitions::network::GeolocationLookup;

/// US state codes recognised in free-text locations.
const US_STATE_CODES: [&str; 10] = ["CA", "NY", "TX", "FL", "IL", "PA", "OH", "GA", "NC", "MI"];

/// Country markers that imply US customary units.
const US_MARKERS: [&str; 4] = [",US", ", US", "USA", "UNITED STATES"];

/// One coordinate, keeping the exact text it was written as.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    value: f64,
    text: String,
}

impl Coordinate {
    /// Parse a trimmed decimal number; non-finite values are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value: f64 = text.parse().ok()?;
        value.is_finite().then(|| Self {
            value,
            text: text.to_string(),
        })
    }

    /// A coordinate produced from a number, printed with four decimals.
    pub fn from_degrees(value: f64) -> Self {
        Self {
            value,
            text: format!("{:.4}", value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// What the weather provider is asked about.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: Coordinate, lon: Coordinate },
    Name(String),
}

impl LocationQuery {
    /// Classify location text.
    ///
    /// Exactly one comma with a number on each side is a coordinate pair;
    /// anything else is a place name, passed through untouched.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split(',');
        if let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) {
            if let (Some(lat), Some(lon)) = (Coordinate::parse(lat), Coordinate::parse(lon)) {
                return Self::Coordinates { lat, lon };
            }
        }
        Self::Name(text.to_string())
    }

    pub fn is_coordinates(&self) -> bool {
        matches!(self, Self::Coordinates { .. })
    }
}

/// Measurement system requested from the provider and used for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Guess the unit system from free-text location (case-insensitive).
    ///
    /// Canada wins over any US marker; then explicit US markers; then a
    /// known state code preceded by a space or comma.
    pub fn from_location_text(location: &str) -> Self {
        let upper = location.to_uppercase();

        if upper.contains("CANADA") {
            return Self::Metric;
        }

        if US_MARKERS.iter().any(|marker| upper.contains(marker)) {
            return Self::Imperial;
        }

        let has_state = US_STATE_CODES.iter().any(|code| {
            upper.contains(&format!(",{}", code)) || upper.contains(&format!(" {}", code))
        });
        if has_state {
            return Self::Imperial;
        }

        Self::Metric
    }

    /// `US` means imperial; every other country is metric.
    pub fn from_country_code(country_code: &str) -> Self {
        if country_code == "US" {
            Self::Imperial
        } else {
            Self::Metric
        }
    }

    /// The provider's `units` query value.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    pub fn speed_suffix(self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Output of [`LocationResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub query: LocationQuery,
    pub units: UnitSystem,
    /// Human-readable label of what was asked for.
    pub label: String,
}

/// Resolves the location for a weather request.
pub struct LocationResolver<'a> {
    geolocation: &'a dyn GeolocationLookup,
}

impl<'a> LocationResolver<'a> {
    pub fn new(geolocation: &'a dyn GeolocationLookup) -> Self {
        Self { geolocation }
    }

    /// Resolve from explicit text when given, otherwise from the client IP.
    ///
    /// Only the IP fallback performs I/O.
    pub async fn resolve(
        &self,
        explicit_location: Option<&str>,
        client_ip: Option<&str>,
    ) -> Result<ResolvedLocation, ToolError> {
        if let Some(location) = non_empty(explicit_location) {
            let resolved = ResolvedLocation {
                query: LocationQuery::parse(location),
                units: UnitSystem::from_location_text(location),
                label: location.to_string(),
            };
            debug!(
                coordinates = resolved.query.is_coordinates(),
                units = resolved.units.as_param(),
                "Resolved explicit location"
            );
            return Ok(resolved);
        }

        let ip = non_empty(client_ip).ok_or(ToolError::MissingClientIp)?;
        let data = self
            .geolocation
            .lookup(ip)
            .await
            .map_err(ToolError::location_resolution_failed)?;

        info!(
            "Resolved client IP to {}, {} ({})",
            data.city, data.country, data.country_code
        );

        Ok(ResolvedLocation {
            query: LocationQuery::Coordinates {
                lat: Coordinate::from_degrees(data.lat),
                lon: Coordinate::from_degrees(data.lon),
            },
            units: UnitSystem::from_country_code(&data.country_code),
            label: format!("{}, {}", data.city, data.country),
        })
    }
}
