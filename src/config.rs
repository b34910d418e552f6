//! Configuration for the tempcast dashboard
//!
//! Loaded in layers, later ones overriding earlier ones:
//! 1. Default values in code
//! 2. An optional config file (`config/tempcast.toml`, or the path in `TEMPCAST_CONFIG`)
//! 3. Environment variables with the `TEMPCAST__` prefix, e.g. `TEMPCAST__WEATHER__API_KEY`
//!
//! The API key has no default and must come from the file or the environment.

use crate::forecast::fetcher::{DEFAULT_BASE_URL, DEFAULT_CITY, DEFAULT_LANG, DEFAULT_UNITS};
use crate::types::prediction::{DEFAULT_HUMIDITY, DEFAULT_WIND_SPEED};
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config/tempcast";
const ENV_PREFIX: &str = "TEMPCAST";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub weather: WeatherConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap credential
    pub api_key: String,

    /// API root, without the `/forecast` path
    pub base_url: String,

    pub city: String,

    pub units: String,

    pub lang: String,

    /// Whole-request timeout for the forecast call, in seconds
    pub timeout_secs: Option<u64>,
}

/// Predictor values for the synthetic future days.
///
/// Day `i` uses the `i`-th humidity and wind speed. Both lists must have the same length.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PredictionConfig {
    #[serde(default = "default_humidity")]
    pub humidity: Vec<f64>,
    #[serde(default = "default_wind_speed")]
    pub wind_speed: Vec<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Number of forecast rows shown in the preview table
    pub preview_rows: usize,
}

impl Config {
    /// Load configuration from the default file location and `TEMPCAST__*` variables
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("TEMPCAST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(&file, Self::environment())
    }

    fn environment() -> Environment {
        // Lists are comma separated, e.g. TEMPCAST__PREDICTION__HUMIDITY=70,65,75
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("prediction.humidity")
            .with_list_parse_key("prediction.wind_speed")
    }

    /// Load configuration from `file` (optional, any format `config` understands) and
    /// the given environment source.
    pub fn load_from(file: &str, environment: Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8501)?
            .set_default("weather.base_url", DEFAULT_BASE_URL)?
            .set_default("weather.city", DEFAULT_CITY)?
            .set_default("weather.units", DEFAULT_UNITS)?
            .set_default("weather.lang", DEFAULT_LANG)?
            .set_default("weather.timeout_secs", 30)?
            .set_default("dashboard.preview_rows", 5)?
            .add_source(File::with_name(file).required(false))
            .add_source(environment)
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.weather.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "weather.api_key is empty; set TEMPCAST__WEATHER__API_KEY".into(),
            ));
        }
        if self.prediction.humidity.is_empty() {
            return Err(ConfigError::Message(
                "prediction.humidity needs at least one value".into(),
            ));
        }
        if self.prediction.humidity.len() != self.prediction.wind_speed.len() {
            return Err(ConfigError::Message(format!(
                "prediction.humidity has {} values but prediction.wind_speed has {}",
                self.prediction.humidity.len(),
                self.prediction.wind_speed.len()
            )));
        }
        Ok(())
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }
}

// Keeps the credential out of debug logs
impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("city", &self.city)
            .field("units", &self.units)
            .field("lang", &self.lang)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            humidity: default_humidity(),
            wind_speed: default_wind_speed(),
        }
    }
}

fn default_humidity() -> Vec<f64> {
    DEFAULT_HUMIDITY.to_vec()
}

fn default_wind_speed() -> Vec<f64> {
    DEFAULT_WIND_SPEED.to_vec()
}
