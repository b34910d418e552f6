use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

/// Format of the `dt_txt` field in forecast responses, e.g. `2024-05-01 12:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One 3-hour forecast entry, reduced to the fields the model and dashboard use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    /// Local forecast time as reported by the API (`YYYY-MM-DD HH:MM:SS`).
    pub timestamp: String,
    /// Maximum temperature in °C.
    pub temp_max: f64,
    /// Minimum temperature in °C.
    pub temp_min: f64,
    /// Relative humidity in percent.
    pub humidity: i32,
    /// Wind speed in m/s.
    pub wind_speed: f64,
}

impl ForecastRecord {
    /// Parses `timestamp` and returns its ordinal day within the year (1..=366).
    pub fn day_of_year(&self) -> Result<u32, chrono::ParseError> {
        day_of_year(&self.timestamp)
    }
}

pub(crate) fn day_of_year(timestamp: &str) -> Result<u32, chrono::ParseError> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map(|dt| dt.ordinal())
}
