//! Contains the `ForecastFrame` structure, the tabular form of a fetched forecast.

use crate::types::forecast_record::ForecastRecord;
use polars::prelude::*;

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_TEMP_MAX: &str = "temp_max";
pub const COL_TEMP_MIN: &str = "temp_min";
pub const COL_HUMIDITY: &str = "humidity";
pub const COL_WIND_SPEED: &str = "wind_speed";

/// Column order of every `ForecastFrame`.
pub const FORECAST_COLUMNS: [&str; 5] = [
    COL_TIMESTAMP,
    COL_TEMP_MAX,
    COL_TEMP_MIN,
    COL_HUMIDITY,
    COL_WIND_SPEED,
];

/// A wrapper around a Polars `DataFrame` holding forecast entries in API order.
///
/// The frame always has the columns listed in [`FORECAST_COLUMNS`]:
///
/// | column       | dtype   | unit |
/// |--------------|---------|------|
/// | `timestamp`  | String  | `YYYY-MM-DD HH:MM:SS` |
/// | `temp_max`   | Float64 | °C   |
/// | `temp_min`   | Float64 | °C   |
/// | `humidity`   | Int64   | %    |
/// | `wind_speed` | Float64 | m/s  |
///
/// Timestamps are not required to be unique.
///
/// Instances are typically obtained via [`crate::ForecastFetcher::fetch`] or
/// [`ForecastFrame::from_records`].
#[derive(Debug, Clone)]
pub struct ForecastFrame {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
}

impl ForecastFrame {
    /// Builds a frame from forecast records, keeping their order.
    ///
    /// An empty slice gives a zero-row frame that still carries the full schema.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the columns cannot be assembled into a `DataFrame`.
    pub fn from_records(records: &[ForecastRecord]) -> PolarsResult<Self> {
        let timestamps: Vec<String> = records.iter().map(|r| r.timestamp.clone()).collect();
        let temp_max: Vec<f64> = records.iter().map(|r| r.temp_max).collect();
        let temp_min: Vec<f64> = records.iter().map(|r| r.temp_min).collect();
        let humidity: Vec<i64> = records.iter().map(|r| i64::from(r.humidity)).collect();
        let wind_speed: Vec<f64> = records.iter().map(|r| r.wind_speed).collect();

        let frame = DataFrame::new(vec![
            Column::new(COL_TIMESTAMP.into(), timestamps),
            Column::new(COL_TEMP_MAX.into(), temp_max),
            Column::new(COL_TEMP_MIN.into(), temp_min),
            Column::new(COL_HUMIDITY.into(), humidity),
            Column::new(COL_WIND_SPEED.into(), wind_speed),
        ])?;

        Ok(Self { frame })
    }

    /// Number of forecast entries.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Returns a new frame with at most the first `n` entries.
    pub fn head(&self, n: usize) -> ForecastFrame {
        ForecastFrame {
            frame: self.frame.head(Some(n)),
        }
    }

    /// Collects the frame back into records, in frame order.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if a column is missing, has an unexpected dtype,
    /// contains a null, or holds a humidity that does not fit in an `i32`.
    pub fn records(&self) -> PolarsResult<Vec<ForecastRecord>> {
        let timestamps = self.frame.column(COL_TIMESTAMP)?.str()?;
        let temp_max = self.frame.column(COL_TEMP_MAX)?.f64()?;
        let temp_min = self.frame.column(COL_TEMP_MIN)?.f64()?;
        let humidity = self.frame.column(COL_HUMIDITY)?.i64()?;
        let wind_speed = self.frame.column(COL_WIND_SPEED)?.f64()?;

        (0..self.frame.height())
            .map(|idx| {
                let humidity = required(humidity.get(idx), COL_HUMIDITY, idx)?;
                Ok(ForecastRecord {
                    timestamp: required(timestamps.get(idx), COL_TIMESTAMP, idx)?.to_string(),
                    temp_max: required(temp_max.get(idx), COL_TEMP_MAX, idx)?,
                    temp_min: required(temp_min.get(idx), COL_TEMP_MIN, idx)?,
                    humidity: i32::try_from(humidity).map_err(|_| {
                        PolarsError::ComputeError(
                            format!("humidity {humidity} at row {idx} is out of range").into(),
                        )
                    })?,
                    wind_speed: required(wind_speed.get(idx), COL_WIND_SPEED, idx)?,
                })
            })
            .collect()
    }

    /// Serialises the frame as CSV with a header row.
    pub fn to_csv(&self) -> PolarsResult<Vec<u8>> {
        let mut frame = self.frame.clone();
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(&mut frame)?;
        Ok(buffer)
    }
}

fn required<T>(value: Option<T>, column: &str, idx: usize) -> PolarsResult<T> {
    value.ok_or_else(|| {
        PolarsError::ComputeError(format!("null value in column '{column}' at row {idx}").into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<ForecastRecord> {
        vec![
            ForecastRecord {
                timestamp: "2024-05-01 00:00:00".to_string(),
                temp_max: 17.2,
                temp_min: 15.9,
                humidity: 81,
                wind_speed: 4.1,
            },
            ForecastRecord {
                timestamp: "2024-05-01 03:00:00".to_string(),
                temp_max: 16.4,
                temp_min: 16.1,
                humidity: 85,
                wind_speed: 3.7,
            },
            ForecastRecord {
                timestamp: "2024-05-01 03:00:00".to_string(),
                temp_max: 16.0,
                temp_min: 15.5,
                humidity: 86,
                wind_speed: 3.2,
            },
        ]
    }

    #[test]
    fn test_from_records_schema() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ForecastFrame::from_records(&sample_records())?;

        let names: Vec<&str> = frame
            .frame
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, FORECAST_COLUMNS);
        assert_eq!(frame.frame.column(COL_HUMIDITY)?.dtype(), &DataType::Int64);
        assert_eq!(frame.frame.column(COL_TEMP_MAX)?.dtype(), &DataType::Float64);
        Ok(())
    }

    #[test]
    fn test_records_preserve_order_and_duplicates() -> Result<(), Box<dyn std::error::Error>> {
        let records = sample_records();
        let frame = ForecastFrame::from_records(&records)?;

        assert_eq!(frame.height(), 3);
        assert_eq!(frame.records()?, records);
        Ok(())
    }

    #[test]
    fn test_empty_frame_keeps_schema() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ForecastFrame::from_records(&[])?;

        assert!(frame.is_empty());
        assert_eq!(frame.frame.width(), FORECAST_COLUMNS.len());
        assert!(frame.records()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_head_limits_rows() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ForecastFrame::from_records(&sample_records())?;

        assert_eq!(frame.head(2).height(), 2);
        assert_eq!(frame.head(10).height(), 3);
        assert_eq!(frame.head(2).records()?[1].temp_max, 16.4);
        Ok(())
    }

    #[test]
    fn test_to_csv_has_header_and_rows() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ForecastFrame::from_records(&sample_records())?;

        let csv = String::from_utf8(frame.to_csv()?)?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,temp_max,temp_min,humidity,wind_speed");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2024-05-01 00:00:00,"));
        Ok(())
    }
}
