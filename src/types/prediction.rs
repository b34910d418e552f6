use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Humidity (%) used for the synthetic future days when nothing else is configured.
pub const DEFAULT_HUMIDITY: [f64; 5] = [70.0, 65.0, 75.0, 80.0, 60.0];
/// Wind speed (m/s) used for the synthetic future days when nothing else is configured.
pub const DEFAULT_WIND_SPEED: [f64; 5] = [5.0, 10.0, 8.0, 6.0, 7.0];

/// One row of predictor values for the temperature model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInput {
    pub day_of_year: u32,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl PredictionInput {
    /// Builds one input per future day, starting the day after `today`.
    ///
    /// Day `i` (1-based) gets `today.ordinal() + i` as its day-of-year, without wrapping
    /// at the end of the year, and the `i`-th humidity and wind speed values. The number
    /// of rows is the length of the shorter series.
    pub fn for_days_after(today: NaiveDate, humidity: &[f64], wind_speed: &[f64]) -> Vec<Self> {
        humidity
            .iter()
            .zip(wind_speed)
            .zip(1u32..)
            .map(|((&humidity, &wind_speed), offset)| PredictionInput {
                day_of_year: today.ordinal() + offset,
                humidity,
                wind_speed,
            })
            .collect()
    }

    /// The five hardcoded rows shown on the dashboard by default.
    pub fn synthetic(today: NaiveDate) -> Vec<Self> {
        Self::for_days_after(today, &DEFAULT_HUMIDITY, &DEFAULT_WIND_SPEED)
    }
}

/// A predicted maximum temperature for one future day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// 1-based position of the day after today.
    pub day: usize,
    pub input: PredictionInput,
    /// Predicted maximum temperature in °C.
    pub temp_max: f64,
}

impl Prediction {
    pub fn from_outputs(inputs: &[PredictionInput], outputs: &[f64]) -> Vec<Self> {
        inputs
            .iter()
            .zip(outputs)
            .enumerate()
            .map(|(idx, (input, &temp_max))| Prediction {
                day: idx + 1,
                input: *input,
                temp_max,
            })
            .collect()
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dia {}: Temperatura máxima prevista: {:.2}°C",
            self.day, self.temp_max
        )
    }
}
