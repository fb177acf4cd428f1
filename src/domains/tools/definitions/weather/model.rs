//! OpenWeatherMap payloads.
//!
//! Every field defaults, so a payload with missing fields still parses and
//! the formatter sees zero values.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One weather condition entry (`weather[]`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub id: i64,
    /// Machine-readable group, e.g. "Rain".
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Readings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa.
    pub pressure: i64,
    /// Percent.
    pub humidity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Wind {
    pub speed: f64,
    /// Meteorological degrees.
    pub deg: i64,
    pub gust: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Clouds {
    /// Cloud cover percent.
    pub all: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current weather (`/weather`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherReport {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    pub main: Readings,
    /// Meters.
    pub visibility: i64,
    pub wind: Wind,
    pub clouds: Clouds,
    pub dt: i64,
    pub sys: Sys,
    /// Offset from UTC in seconds.
    pub timezone: i32,
    pub name: String,
}

/// Precipitation volume over the sample window.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Volume {
    #[serde(rename = "3h")]
    pub three_hours: f64,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSample {
    /// Unix timestamp (UTC).
    pub dt: i64,
    pub main: Readings,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    pub visibility: i64,
    /// Probability of precipitation, 0.0..=1.0.
    pub pop: f64,
    pub rain: Option<Volume>,
    pub snow: Option<Volume>,
    pub dt_txt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub coord: Coord,
    pub country: String,
    pub population: i64,
    /// Offset from UTC in seconds.
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

/// 5-day / 3-hour forecast (`/forecast`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastReport {
    pub cnt: i64,
    pub list: Vec<ForecastSample>,
    pub city: City,
}
