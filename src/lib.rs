pub mod config;
mod dashboard;
mod error;
mod forecast;
mod model;
mod types;

#[cfg(test)]
mod test_support;

pub use error::TempcastError;

pub use forecast::error::FetchError;
pub use forecast::fetcher::*;

pub use model::error::ModelError;
pub use model::regression::{Coefficients, TemperatureModel};
pub use model::training_set::TrainingSet;

pub use types::forecast_frame::*;
pub use types::forecast_record::{ForecastRecord, TIMESTAMP_FORMAT};
pub use types::prediction::*;

pub use dashboard::page::{DashboardPage, Notice, Stage};
pub use dashboard::pipeline::{Dashboard, DEFAULT_PREVIEW_ROWS};
pub use dashboard::render::render_html;
pub use dashboard::server::{create_app, AppState, DashboardError};
