//! Ordinary least-squares model of forecast maximum temperature.

use crate::model::error::ModelError;
use crate::model::training_set::{input_matrix, TrainingSet, N_FEATURES};
use crate::types::forecast_frame::ForecastFrame;
use crate::types::prediction::PredictionInput;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use log::debug;
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

/// Learned weights of a [`TemperatureModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    pub day_of_year: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub intercept: f64,
}

/// A linear function `temp_max ≈ a·day_of_year + b·humidity + c·wind_speed + d`
/// fitted by ordinary least squares, without regularisation.
///
/// A predictor that has the same value on every row carries no information. Its
/// coefficient is fixed at 0 and the remaining predictors are fitted alone.
///
/// # Examples
///
/// ```
/// # use tempcast::{ForecastFrame, ForecastRecord, PredictionInput, TemperatureModel};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let rows: Vec<ForecastRecord> = [(1, 70, 5.0, 10.0), (2, 65, 10.0, 12.0), (3, 75, 8.0, 11.0),
///                                  (4, 80, 6.0, 13.0), (5, 60, 7.0, 9.0)]
///     .into_iter()
///     .map(|(day, humidity, wind_speed, temp_max)| ForecastRecord {
///         timestamp: format!("2024-01-{day:02} 12:00:00"),
///         temp_max,
///         temp_min: temp_max - 3.0,
///         humidity,
///         wind_speed,
///     })
///     .collect();
///
/// let model = TemperatureModel::fit(&ForecastFrame::from_records(&rows)?)?;
/// let input = PredictionInput { day_of_year: 6, humidity: 70.0, wind_speed: 5.0 };
/// let predicted = model.predict(&[input])?;
/// assert_eq!(predicted.len(), 1);
/// assert!(predicted[0].is_finite());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemperatureModel {
    params: Array1<f64>,
    intercept: f64,
}

impl TemperatureModel {
    /// Fits the model on every row of `frame`. No rows are held out.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoData`] for an empty frame, [`ModelError::Timestamp`] for an
    /// unparsable timestamp, [`ModelError::Underdetermined`] when there are too few rows
    /// for the varying predictors and [`ModelError::Fit`] when the solver fails.
    pub fn fit(frame: &ForecastFrame) -> Result<Self, ModelError> {
        Self::fit_set(&TrainingSet::from_frame(frame)?)
    }

    /// Fits the model on already derived training data.
    pub fn fit_set(set: &TrainingSet) -> Result<Self, ModelError> {
        if set.is_empty() {
            return Err(ModelError::NoData);
        }

        let varying: Vec<usize> = (0..N_FEATURES)
            .filter(|&col| !is_constant(&set.records, col))
            .collect();
        let mut params = Array1::zeros(N_FEATURES);

        if varying.is_empty() {
            let intercept = set.targets.mean().unwrap_or(0.0);
            debug!("All predictors constant over {} rows, intercept {}", set.len(), intercept);
            return Ok(Self { params, intercept });
        }
        if set.len() <= varying.len() {
            return Err(ModelError::Underdetermined {
                rows: set.len(),
                features: varying.len(),
            });
        }

        let records = set.records.select(Axis(1), &varying);
        let dataset = Dataset::new(records, set.targets.clone());
        let fitted = LinearRegression::new().fit(&dataset)?;
        for (&col, &value) in varying.iter().zip(fitted.params()) {
            params[col] = value;
        }
        debug!(
            "Fitted linear model on {} rows: params {:?}, intercept {}",
            set.len(),
            params,
            fitted.intercept()
        );

        Ok(Self {
            params,
            intercept: fitted.intercept(),
        })
    }

    /// Predicts the maximum temperature for each input row, in order.
    pub fn predict(&self, inputs: &[PredictionInput]) -> Result<Vec<f64>, ModelError> {
        Ok(self.predict_records(&input_matrix(inputs)?).to_vec())
    }

    fn predict_records(&self, records: &Array2<f64>) -> Array1<f64> {
        records.dot(&self.params) + self.intercept
    }

    pub fn coefficients(&self) -> Coefficients {
        Coefficients {
            day_of_year: self.params[0],
            humidity: self.params[1],
            wind_speed: self.params[2],
            intercept: self.intercept,
        }
    }

    /// Mean absolute error of the model's predictions against `set.targets`.
    ///
    /// Evaluated on the training data itself, so it measures fit, not forecast skill.
    pub fn mean_absolute_error(&self, set: &TrainingSet) -> f64 {
        (&self.predict_records(&set.records) - &set.targets)
            .mapv(f64::abs)
            .mean()
            .unwrap_or(0.0)
    }
}

fn is_constant(records: &Array2<f64>, col: usize) -> bool {
    let column = records.column(col);
    let (min, max) = column
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    max - min <= 1e-12 * min.abs().max(max.abs()).max(1.0)
}
