use crate::config::Config;
use crate::dashboard::page::{DashboardPage, Notice};
use crate::forecast::error::FetchError;
use crate::forecast::fetcher::{ForecastFetcher, DEFAULT_CITY};
use crate::model::regression::TemperatureModel;
use crate::model::training_set::TrainingSet;
use crate::types::forecast_frame::ForecastFrame;
use crate::types::prediction::{Prediction, PredictionInput, DEFAULT_HUMIDITY, DEFAULT_WIND_SPEED};
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Runs fetch, preview, training and prediction for one city.
///
/// Nothing is kept between calls: every [`Dashboard::build_page`] fetches again and
/// fits a fresh model.
#[derive(Clone)]
pub struct Dashboard {
    fetcher: ForecastFetcher,
    city: String,
    humidity: Vec<f64>,
    wind_speed: Vec<f64>,
    preview_rows: usize,
}

#[bon]
impl Dashboard {
    /// Creates a new `Dashboard`.
    ///
    /// # Arguments
    ///
    /// * `.fetcher(ForecastFetcher)`: **Required.** Source of the forecast.
    /// * `.city(String)`: Optional. Defaults to `Lisboa`.
    /// * `.humidity(Vec<f64>)` / `.wind_speed(Vec<f64>)`: Optional. Predictor values for the
    ///   future days, one per day. Default to the five synthetic days.
    /// * `.preview_rows(usize)`: Optional. Rows in the preview table, defaults to 5.
    #[builder]
    pub fn new(
        fetcher: ForecastFetcher,
        #[builder(into)] city: Option<String>,
        humidity: Option<Vec<f64>>,
        wind_speed: Option<Vec<f64>>,
        preview_rows: Option<usize>,
    ) -> Self {
        Self {
            fetcher,
            city: city.unwrap_or_else(|| DEFAULT_CITY.to_string()),
            humidity: humidity.unwrap_or_else(|| DEFAULT_HUMIDITY.to_vec()),
            wind_speed: wind_speed.unwrap_or_else(|| DEFAULT_WIND_SPEED.to_vec()),
            preview_rows: preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
        }
    }

    /// Builds the dashboard from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = ForecastFetcher::builder()
            .api_key(config.weather.api_key.clone())
            .base_url(config.weather.base_url.clone())
            .units(config.weather.units.clone())
            .lang(config.weather.lang.clone())
            .maybe_timeout(config.weather.timeout())
            .build()?;

        Ok(Self::builder()
            .fetcher(fetcher)
            .city(config.weather.city.clone())
            .humidity(config.prediction.humidity.clone())
            .wind_speed(config.prediction.wind_speed.clone())
            .preview_rows(config.dashboard.preview_rows)
            .build())
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Fetches the forecast table alone, for the CSV export.
    pub async fn fetch_frame(&self) -> Result<ForecastFrame, FetchError> {
        self.fetcher.fetch(&self.city).await
    }

    /// Runs the whole pipeline for `today`.
    ///
    /// A fetch failure leaves exactly one notice on the page and nothing else is filled.
    pub async fn build_page(&self, today: NaiveDate) -> DashboardPage {
        let page = DashboardPage::new(&self.city);

        match self.fetch_frame().await {
            Ok(frame) => self.complete(page, &frame, today),
            Err(err) => {
                warn!("Forecast fetch for {} failed: {}", self.city, err);
                with_notice(page, Notice::from_fetch(&err))
            }
        }
    }

    /// Fills preview, model and predictions from an already fetched `frame`.
    ///
    /// A training failure adds exactly one notice and leaves the prediction sections empty.
    pub fn complete(
        &self,
        mut page: DashboardPage,
        frame: &ForecastFrame,
        today: NaiveDate,
    ) -> DashboardPage {
        match frame.head(self.preview_rows).records() {
            Ok(rows) => page.preview = Some(rows),
            Err(err) => return with_notice(page, Notice::from_fetch(&FetchError::DataFrame(err))),
        }

        let trained = TrainingSet::from_frame(frame).and_then(|set| {
            let model = TemperatureModel::fit_set(&set)?;
            let mae = model.mean_absolute_error(&set);
            Ok((model, mae))
        });
        let (model, mae) = match trained {
            Ok(trained) => trained,
            Err(err) => {
                warn!("Training on {} rows failed: {}", frame.height(), err);
                return with_notice(page, Notice::from_model(&err));
            }
        };

        let inputs = PredictionInput::for_days_after(today, &self.humidity, &self.wind_speed);
        let outputs = match model.predict(&inputs) {
            Ok(outputs) => outputs,
            Err(err) => return with_notice(page, Notice::from_model(&err)),
        };

        info!(
            "Predicted {} days for {} from {} forecast rows (in-sample MAE {:.2})",
            outputs.len(),
            self.city,
            frame.height(),
            mae
        );
        page.coefficients = Some(model.coefficients());
        page.training_mae = Some(mae);
        page.predictions = Some(Prediction::from_outputs(&inputs, &outputs));
        page
    }
}

fn with_notice(mut page: DashboardPage, notice: Notice) -> DashboardPage {
    page.notices.push(notice);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{forecast_body, spawn_upstream, stub_forecast_router, Entry};

    const KEY: &str = "test-key";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn week_of_entries() -> Vec<Entry> {
        vec![
            Entry::new("2024-05-01 12:00:00", 21.3, 19.8, 64, 5.2),
            Entry::new("2024-05-01 15:00:00", 22.9, 21.0, 58, 6.1),
            Entry::new("2024-05-02 12:00:00", 19.4, 18.7, 71, 4.4),
            Entry::new("2024-05-02 15:00:00", 18.2, 17.1, 80, 2.0),
            Entry::new("2024-05-03 12:00:00", 23.5, 20.2, 55, 7.3),
            Entry::new("2024-05-03 15:00:00", 20.8, 19.0, 67, 3.9),
            Entry::new("2024-05-04 12:00:00", 17.6, 16.4, 90, 1.5),
            Entry::new("2024-05-05 12:00:00", 24.1, 20.5, 61, 8.8),
        ]
    }

    async fn dashboard_for(body: String, key: &str) -> Dashboard {
        let (router, _) = stub_forecast_router(KEY, body);
        let base_url = spawn_upstream(router).await;
        let fetcher = ForecastFetcher::builder()
            .api_key(key)
            .base_url(base_url)
            .build()
            .unwrap();
        Dashboard::builder().fetcher(fetcher).build()
    }

    #[tokio::test]
    async fn test_build_page_shows_preview_and_five_predictions() {
        let dashboard = dashboard_for(forecast_body(&week_of_entries()), KEY).await;

        let page = dashboard.build_page(today()).await;

        assert!(page.notices.is_empty(), "{:?}", page.notices);
        assert_eq!(page.title, "Previsão de Temperatura - Lisboa");
        assert_eq!(page.preview.as_ref().map(Vec::len), Some(5));

        let lines = page.prediction_lines();
        assert_eq!(lines.len(), 5);
        for (idx, line) in lines.iter().enumerate() {
            let prefix = format!("Dia {}: Temperatura máxima prevista: ", idx + 1);
            assert!(line.starts_with(&prefix), "{}", line);
            assert!(line.ends_with("°C"), "{}", line);
            let value = &line[prefix.len()..line.len() - "°C".len()];
            assert_eq!(value.split('.').nth(1).map(str::len), Some(2), "{}", line);
        }

        let predictions = page.predictions.unwrap();
        assert_eq!(predictions[0].input.day_of_year, 123);
        assert_eq!(predictions[4].input.day_of_year, 127);
        assert!(page.training_mae.unwrap() >= 0.0);
        assert!(page.coefficients.is_some());
    }

    #[tokio::test]
    async fn test_missing_list_gives_one_notice() {
        let body = serde_json::json!({"cod": "404", "message": "city not found"}).to_string();
        let dashboard = dashboard_for(body, KEY).await;

        let page = dashboard.build_page(today()).await;

        assert_eq!(page.notices.len(), 1);
        assert_eq!(page.notices[0].message, "Dados não encontrados na resposta JSON.");
        assert!(page.preview.is_none());
        assert!(page.predictions.is_none());
    }

    #[tokio::test]
    async fn test_rejected_key_gives_one_request_notice() {
        let dashboard = dashboard_for(forecast_body(&week_of_entries()), "wrong-key").await;

        let page = dashboard.build_page(today()).await;

        assert_eq!(page.notices.len(), 1);
        let message = &page.notices[0].message;
        assert!(message.starts_with("Erro de requisição: "), "{}", message);
        assert!(message.contains("401"), "{}", message);
        assert!(!message.contains("wrong-key"), "{}", message);
        assert!(page.predictions.is_none());
    }

    #[tokio::test]
    async fn test_empty_list_gives_one_training_notice() {
        let dashboard = dashboard_for(forecast_body(&[]), KEY).await;

        let page = dashboard.build_page(today()).await;

        assert_eq!(page.notices.len(), 1);
        assert_eq!(page.notices[0].message, "Sem dados para treinar o modelo.");
        assert_eq!(page.preview.as_ref().map(Vec::len), Some(0));
        assert!(page.predictions.is_none());
        assert!(page.training_mae.is_none());
    }

    #[test]
    fn test_complete_uses_configured_prediction_series() {
        let fetcher = ForecastFetcher::builder().api_key(KEY).build().unwrap();
        let dashboard = Dashboard::builder()
            .fetcher(fetcher)
            .city("Porto")
            .humidity(vec![50.0, 55.0])
            .wind_speed(vec![2.0, 3.0])
            .preview_rows(2)
            .build();
        let records: Vec<_> = week_of_entries()
            .into_iter()
            .map(|e| crate::types::forecast_record::ForecastRecord {
                timestamp: e.timestamp,
                temp_max: e.temp_max,
                temp_min: e.temp_min,
                humidity: e.humidity,
                wind_speed: e.wind_speed,
            })
            .collect();
        let frame = ForecastFrame::from_records(&records).unwrap();

        let page = dashboard.complete(DashboardPage::new(dashboard.city()), &frame, today());

        assert_eq!(page.title, "Previsão de Temperatura - Porto");
        assert_eq!(page.preview.as_ref().map(Vec::len), Some(2));
        assert_eq!(page.prediction_lines().len(), 2);
    }
}
