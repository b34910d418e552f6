//! The assembled dashboard content, independent of how it is rendered.

use crate::forecast::error::FetchError;
use crate::model::error::ModelError;
use crate::model::regression::Coefficients;
use crate::types::forecast_record::ForecastRecord;
use crate::types::prediction::Prediction;
use serde::Serialize;
use std::error::Error;

/// Pipeline stage that produced a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetch,
    Training,
}

/// A user-facing error message shown instead of the remaining dashboard sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub stage: Stage,
    pub message: String,
}

impl Notice {
    pub fn from_fetch(err: &FetchError) -> Self {
        let message = match err {
            FetchError::NetworkRequest(..)
            | FetchError::HttpStatus { .. }
            | FetchError::ResponseBody(..)
            | FetchError::InvalidJson(_)
            | FetchError::ClientBuild(_) => {
                format!("Erro de requisição: {}", error_chain(err))
            }
            FetchError::MissingList { .. } => "Dados não encontrados na resposta JSON.".to_string(),
            FetchError::DataFrame(_) => {
                format!("Erro de processamento de dados: {}", error_chain(err))
            }
            FetchError::EntryShape(_) => {
                format!("Ocorreu um erro inesperado: {}", error_chain(err))
            }
        };
        Self {
            stage: Stage::Fetch,
            message,
        }
    }

    pub fn from_model(err: &ModelError) -> Self {
        let message = match err {
            ModelError::NoData => "Sem dados para treinar o modelo.".to_string(),
            _ => format!("Erro ao treinar o modelo: {}", error_chain(err)),
        };
        Self {
            stage: Stage::Training,
            message,
        }
    }
}

/// Joins an error with all of its sources, `outer: inner: innermost`.
fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let inner_text = inner.to_string();
        // thiserror messages that already interpolate their source
        if !text.ends_with(&inner_text) {
            text.push_str(": ");
            text.push_str(&inner_text);
        }
        source = inner.source();
    }
    text
}

/// Everything one dashboard request produced.
///
/// Sections are filled in pipeline order. A section that is `None` was never reached,
/// and in that case `notices` holds the reason.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub city: String,
    pub title: String,
    pub notices: Vec<Notice>,
    /// First rows of the fetched forecast.
    pub preview: Option<Vec<ForecastRecord>>,
    pub predictions: Option<Vec<Prediction>>,
    pub coefficients: Option<Coefficients>,
    /// In-sample mean absolute error of the fitted model, in °C.
    pub training_mae: Option<f64>,
}

impl DashboardPage {
    pub fn new(city: &str) -> Self {
        Self {
            city: city.to_string(),
            title: format!("Previsão de Temperatura - {city}"),
            notices: Vec::new(),
            preview: None,
            predictions: None,
            coefficients: None,
            training_mae: None,
        }
    }

    /// The prediction lines, e.g. `Dia 1: Temperatura máxima prevista: 21.46°C`.
    pub fn prediction_lines(&self) -> Vec<String> {
        self.predictions
            .iter()
            .flatten()
            .map(ToString::to_string)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.notices.is_empty()
    }
}
