use crate::constants::*;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Without a key every display route is served by the local TSP fallback.
    pub directions_api_key: Option<String>,
    pub directions_base_url: String,
    pub directions_timeout_secs: u64,
    pub location_service_url: String,
    pub location_service_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 3000,
            directions_api_key: None,
            directions_base_url: DEFAULT_DIRECTIONS_BASE_URL.to_string(),
            directions_timeout_secs: DEFAULT_DIRECTIONS_TIMEOUT_SECS,
            location_service_url: DEFAULT_LOCATION_SERVICE_URL.to_string(),
            location_service_timeout_secs: DEFAULT_LOCATION_SERVICE_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let directions_timeout_secs: u64 = env::var("DIRECTIONS_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_DIRECTIONS_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid DIRECTIONS_TIMEOUT_SECS")?;

        if !(MIN_DIRECTIONS_TIMEOUT_SECS..=MAX_DIRECTIONS_TIMEOUT_SECS)
            .contains(&directions_timeout_secs)
        {
            return Err(format!(
                "DIRECTIONS_TIMEOUT_SECS must be between {} and {} seconds",
                MIN_DIRECTIONS_TIMEOUT_SECS, MAX_DIRECTIONS_TIMEOUT_SECS
            ));
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            directions_api_key: env::var("DIRECTIONS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            directions_base_url: env::var("DIRECTIONS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DIRECTIONS_BASE_URL.to_string()),
            directions_timeout_secs,
            location_service_url: env::var("LOCATION_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_LOCATION_SERVICE_URL.to_string()),
            location_service_timeout_secs: env::var("LOCATION_SERVICE_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_LOCATION_SERVICE_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| "Invalid LOCATION_SERVICE_TIMEOUT_SECS")?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn directions_timeout(&self) -> Duration {
        Duration::from_secs(self.directions_timeout_secs)
    }

    pub fn location_service_timeout(&self) -> Duration {
        Duration::from_secs(self.location_service_timeout_secs)
    }
}
