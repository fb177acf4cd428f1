//! Tool definitions module.
//!
//! Each tool lives in its own file under a family module:
//!
//! - `calculator/` - `calculate` and `arithmetic`
//! - `network/` - `get_ip`, `get_ip_data` and the geolocation adapter
//! - `weather/` - `get_weather` and `get_weather_forecast`

pub mod calculator;
pub mod network;
pub mod weather;

pub use calculator::{ArithmeticParams, ArithmeticTool, CalculateParams, CalculateTool, Operation};
pub use network::{
    GeolocationLookup, GeolocationResult, GetIpDataParams, GetIpDataTool, GetIpTool, IpApiClient,
};
pub use weather::{ForecastParams, GetWeatherForecastTool, GetWeatherTool, WeatherParams};
