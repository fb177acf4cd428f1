//! Weather tools.
//!
//! Current conditions and a 5-day forecast from OpenWeatherMap, for an
//! explicit location or for the client's IP-derived location.

pub mod current;
pub mod forecast;
pub mod format;
pub mod location;
pub mod model;
pub mod query;
pub mod service;

pub use current::{GetWeatherTool, WeatherParams};
pub use forecast::{ForecastParams, GetWeatherForecastTool};
pub use location::{LocationQuery, LocationResolver, ResolvedLocation, UnitSystem};
pub use service::WeatherClient;
