//! Weather provider request URLs.

use super::location::{LocationQuery, UnitSystem};

/// Which provider endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Current conditions (`/weather`).
    Current,
    /// 5-day / 3-hour forecast (`/forecast`).
    Forecast,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Current => "weather",
            Self::Forecast => "forecast",
        }
    }
}

/// Build the provider URL for a location.
///
/// Coordinates go out as `lat`/`lon` exactly as written; names go out
/// verbatim as `q` (commas included). `appid` and `units` always follow.
pub fn build_url(
    base_url: &str,
    endpoint: Endpoint,
    query: &LocationQuery,
    units: UnitSystem,
    api_key: &str,
) -> String {
    let location = match query {
        LocationQuery::Coordinates { lat, lon } => format!("lat={}&lon={}", lat, lon),
        LocationQuery::Name(name) => format!("q={}", name),
    };

    format!(
        "{}/{}?{}&appid={}&units={}",
        base_url.trim_end_matches('/'),
        endpoint.path(),
        location,
        api_key,
        units.as_param()
    )
}
