use crate::types::forecast_record::ForecastRecord;
use serde::Deserialize;

/// Body of the `/forecast` endpoint, reduced to what is read.
///
/// `list` stays optional so a well-formed body without it can be told apart from
/// a malformed one.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Option<Vec<ForecastEntry>>,
    // A string on error payloads (`"city not found"`), the number 0 on success
    pub message: Option<serde_json::Value>,
}

impl ForecastResponse {
    pub fn message_text(&self) -> Option<String> {
        match &self.message {
            Some(serde_json::Value::String(text)) => Some(text.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEntry {
    dt_txt: String,
    main: EntryMain,
    wind: EntryWind,
}

#[derive(Debug, Deserialize)]
struct EntryMain {
    temp_max: f64,
    temp_min: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct EntryWind {
    speed: f64,
}

impl From<ForecastEntry> for ForecastRecord {
    fn from(entry: ForecastEntry) -> Self {
        ForecastRecord {
            timestamp: entry.dt_txt,
            temp_max: entry.main.temp_max,
            temp_min: entry.main.temp_min,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
        }
    }
}
