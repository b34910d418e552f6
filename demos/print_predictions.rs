//! Fetches the configured city's forecast, fits the model and prints the five predictions.
//!
//! Needs `TEMPCAST__WEATHER__API_KEY` in the environment or in `.env`.

use chrono::Local;
use tempcast::config::Config;
use tempcast::{ForecastFetcher, Prediction, PredictionInput, TemperatureModel, TempcastError};

#[tokio::main]
async fn main() -> Result<(), TempcastError> {
    dotenvy::dotenv().ok();
    configure_polars_display();
    let config = Config::load()?;

    let fetcher = ForecastFetcher::builder()
        .api_key(config.weather.api_key.clone())
        .base_url(config.weather.base_url.clone())
        .units(config.weather.units.clone())
        .lang(config.weather.lang.clone())
        .maybe_timeout(config.weather.timeout())
        .build()?;

    let forecast = fetcher.fetch(&config.weather.city).await?;
    println!("Previsão de Temperatura - {}", config.weather.city);
    println!("{}", forecast.head(5).frame);

    let model = TemperatureModel::fit(&forecast)?;
    println!("{:?}", model.coefficients());

    let inputs = PredictionInput::for_days_after(
        Local::now().date_naive(),
        &config.prediction.humidity,
        &config.prediction.wind_speed,
    );
    let predicted = model.predict(&inputs)?;

    for prediction in Prediction::from_outputs(&inputs, &predicted) {
        println!("{prediction}");
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    std::env::set_var("POLARS_FMT_MAX_COLS", "-1");
}
