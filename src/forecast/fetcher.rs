//! Provides the `ForecastFetcher`, which downloads a multi-day forecast for a city and
//! turns it into a [`ForecastFrame`].

use crate::forecast::error::FetchError;
use crate::forecast::response::ForecastResponse;
use crate::types::forecast_frame::ForecastFrame;
use crate::types::forecast_record::ForecastRecord;
use bon::bon;
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";
pub const DEFAULT_CITY: &str = "Lisboa";
pub const DEFAULT_UNITS: &str = "metric";
pub const DEFAULT_LANG: &str = "pt_br";

/// Client for the 5 day / 3 hour forecast endpoint.
///
/// Each call to [`ForecastFetcher::fetch`] issues exactly one GET request. There is no
/// retry and no caching.
///
/// # Examples
///
/// ```no_run
/// # use tempcast::{ForecastFetcher, FetchError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), FetchError> {
/// let fetcher = ForecastFetcher::builder()
///     .api_key(std::env::var("TEMPCAST__WEATHER__API_KEY").unwrap_or_default())
///     .build()?;
///
/// let forecast = fetcher.fetch("Lisboa").await?;
/// println!("{} forecast entries", forecast.height());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ForecastFetcher {
    client: Client,
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
}

#[bon]
impl ForecastFetcher {
    /// Creates a new `ForecastFetcher`.
    ///
    /// # Arguments
    ///
    /// * `.api_key(String)`: **Required.** The OpenWeatherMap credential, sent as `appid`.
    /// * `.base_url(String)`: Optional. API root, defaults to [`DEFAULT_BASE_URL`].
    /// * `.units(String)`: Optional. Unit system, defaults to `metric`.
    /// * `.lang(String)`: Optional. Language tag for descriptions, defaults to `pt_br`.
    /// * `.timeout(Duration)`: Optional. Whole-request timeout. Without it the client's
    ///   defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] units: Option<String>,
        #[builder(into)] lang: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut client = Client::builder();
        if let Some(timeout) = timeout {
            client = client.timeout(timeout);
        }
        let client = client.build().map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            units: units.unwrap_or_else(|| DEFAULT_UNITS.to_string()),
            lang: lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
        })
    }

    /// The forecast endpoint, without query parameters.
    pub fn endpoint(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    /// Fetches the forecast for `city` and projects it into a [`ForecastFrame`].
    ///
    /// Rows keep the order of the response's `list`.
    ///
    /// # Errors
    ///
    /// * [`FetchError::NetworkRequest`] if the request could not be sent or timed out.
    /// * [`FetchError::HttpStatus`] for any non-2xx status, including 401 for a bad key.
    /// * [`FetchError::ResponseBody`] if the body could not be read.
    /// * [`FetchError::InvalidJson`] if the body is not JSON.
    /// * [`FetchError::EntryShape`] if an entry lacks a field or has the wrong type.
    /// * [`FetchError::MissingList`] if the JSON has no `list` key.
    /// * [`FetchError::DataFrame`] if the table could not be built.
    ///
    /// Errors never carry the request URL with its query, so the credential stays out
    /// of logs and messages.
    pub async fn fetch(&self, city: &str) -> Result<ForecastFrame, FetchError> {
        let url = self.endpoint();
        info!("Requesting forecast for {} from {}", city, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e.without_url()))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                warn!("HTTP error for {}: {}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::ResponseBody(url.clone(), e.without_url()))?;
        debug!("Received {} bytes from {}", body.len(), url);

        let frame = parse_forecast(&body)?;
        info!("Fetched {} forecast entries for {}", frame.height(), city);
        Ok(frame)
    }
}

/// Parses a forecast response body into a [`ForecastFrame`].
///
/// Exactly five fields are taken from each `list` entry: `dt_txt`, `main.temp_max`,
/// `main.temp_min`, `main.humidity` and `wind.speed`. Everything else is ignored.
pub fn parse_forecast(body: &str) -> Result<ForecastFrame, FetchError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    let message = response.message_text();

    let Some(entries) = response.list else {
        warn!("Forecast response without 'list' key: {:?}", message);
        return Err(FetchError::MissingList { message });
    };

    let records: Vec<ForecastRecord> = entries.into_iter().map(ForecastRecord::from).collect();
    Ok(ForecastFrame::from_records(&records)?)
}
