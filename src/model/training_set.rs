use crate::model::error::ModelError;
use crate::types::forecast_frame::ForecastFrame;
use crate::types::prediction::PredictionInput;
use ndarray::{Array1, Array2};

/// Number of predictor columns: day of year, humidity, wind speed.
pub const N_FEATURES: usize = 3;

/// Predictor matrix and target vector derived from a [`ForecastFrame`].
///
/// Row `i` of `records` is `[day_of_year, humidity, wind_speed]` of forecast entry `i`
/// and `targets[i]` is its `temp_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub records: Array2<f64>,
    pub targets: Array1<f64>,
}

impl TrainingSet {
    /// Derives the training data from every row of `frame`.
    ///
    /// # Errors
    ///
    /// * [`ModelError::NoData`] if the frame has no rows.
    /// * [`ModelError::Timestamp`] if a timestamp is not `YYYY-MM-DD HH:MM:SS`.
    /// * [`ModelError::Column`] if the frame's columns cannot be read.
    pub fn from_frame(frame: &ForecastFrame) -> Result<Self, ModelError> {
        if frame.is_empty() {
            return Err(ModelError::NoData);
        }

        let rows = frame.records()?;
        let mut features = Vec::with_capacity(rows.len() * N_FEATURES);
        let mut targets = Vec::with_capacity(rows.len());

        for row in &rows {
            let day = row.day_of_year().map_err(|source| ModelError::Timestamp {
                timestamp: row.timestamp.clone(),
                source,
            })?;
            features.extend([f64::from(day), f64::from(row.humidity), row.wind_speed]);
            targets.push(row.temp_max);
        }

        Ok(Self {
            records: Array2::from_shape_vec((rows.len(), N_FEATURES), features)?,
            targets: Array1::from(targets),
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Lays prediction inputs out in the same column order as [`TrainingSet::records`].
pub(crate) fn input_matrix(inputs: &[PredictionInput]) -> Result<Array2<f64>, ModelError> {
    let values: Vec<f64> = inputs
        .iter()
        .flat_map(|i| [f64::from(i.day_of_year), i.humidity, i.wind_speed])
        .collect();
    Ok(Array2::from_shape_vec((inputs.len(), N_FEATURES), values)?)
}
