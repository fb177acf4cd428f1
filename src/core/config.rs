//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.
//! Tools receive the loaded configuration explicitly (via `Arc<Config>`);
//! nothing below the entry point reads the environment.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Default OpenWeatherMap API base URL.
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default ip-api.com base URL.
pub const DEFAULT_GEOLOCATION_API_URL: &str = "http://ip-api.com";

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Weather provider configuration.
    pub weather: WeatherConfig,

    /// IP geolocation provider configuration.
    pub geolocation: GeolocationConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// OpenWeatherMap API key.
    /// Get a free key at: https://openweathermap.org/api
    pub openweather_api_key: Option<String>,
}

impl CredentialsConfig {
    /// The OpenWeatherMap key, if one is set and not blank.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.openweather_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "openweather_api_key",
                &self.openweather_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Weather provider endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the OpenWeatherMap-compatible API (no trailing slash).
    pub api_base_url: String,
}

/// IP geolocation provider endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Base URL of the ip-api.com-compatible API (no trailing slash).
    pub api_base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_WEATHER_API_URL.to_string(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_GEOLOCATION_API_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "lazy-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            weather: WeatherConfig::default(),
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings are prefixed with `MCP_` (e.g. `MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`). The weather API key keeps the provider's customary
    /// name, `OPENWEATHER_API_KEY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps =
                timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.credentials.openweather_api_key = std::env::var("OPENWEATHER_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Ok(url) = std::env::var("MCP_WEATHER_API_URL") {
            config.weather.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(url) = std::env::var("MCP_GEOLOCATION_API_URL") {
            config.geolocation.api_base_url = url.trim_end_matches('/').to_string();
        }

        config
    }

    /// Create a default configuration carrying the given weather API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.credentials.openweather_api_key = Some(api_key.into());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_api_key_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("OPENWEATHER_API_KEY", "test_key_12345");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.openweather_api_key.as_deref(),
            Some("test_key_12345")
        );
        unsafe {
            std::env::remove_var("OPENWEATHER_API_KEY");
        }
    }

    #[test]
    fn test_api_key_blank_is_missing() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("OPENWEATHER_API_KEY", "   ");
        }
        let config = Config::from_env();
        assert!(config.credentials.openweather_api_key.is_none());
        unsafe {
            std::env::remove_var("OPENWEATHER_API_KEY");
        }
    }

    #[test]
    fn test_blank_key_set_in_code_is_missing() {
        assert_eq!(Config::with_api_key("   ").credentials.weather_api_key(), None);
        assert_eq!(
            Config::with_api_key(" abc ").credentials.weather_api_key(),
            Some("abc")
        );
        assert_eq!(Config::default().credentials.weather_api_key(), None);
    }

    #[test]
    fn test_base_url_overrides_strip_trailing_slash() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_WEATHER_API_URL", "http://localhost:9000/data/");
            std::env::set_var("MCP_GEOLOCATION_API_URL", "http://localhost:9001/");
        }
        let config = Config::from_env();
        assert_eq!(config.weather.api_base_url, "http://localhost:9000/data");
        assert_eq!(config.geolocation.api_base_url, "http://localhost:9001");
        unsafe {
            std::env::remove_var("MCP_WEATHER_API_URL");
            std::env::remove_var("MCP_GEOLOCATION_API_URL");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            openweather_api_key: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_config_default_has_no_credentials() {
        let config = Config::default();
        assert!(config.credentials.openweather_api_key.is_none());
        assert_eq!(config.weather.api_base_url, DEFAULT_WEATHER_API_URL);
        assert_eq!(config.geolocation.api_base_url, DEFAULT_GEOLOCATION_API_URL);
    }
}
