//! Local stand-in for the forecast API, used by the unit tests.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub(crate) type SeenQuery = Arc<Mutex<Option<HashMap<String, String>>>>;

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub timestamp: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: i32,
    pub wind_speed: f64,
}

impl Entry {
    pub fn new(timestamp: &str, temp_max: f64, temp_min: f64, humidity: i32, wind_speed: f64) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            temp_max,
            temp_min,
            humidity,
            wind_speed,
        }
    }
}

/// Builds a body shaped like the real `/forecast` response, extra fields included.
pub(crate) fn forecast_body(entries: &[Entry]) -> String {
    let list: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            json!({
                "dt": 1714564800,
                "main": {
                    "temp": (e.temp_max + e.temp_min) / 2.0,
                    "feels_like": e.temp_max,
                    "temp_min": e.temp_min,
                    "temp_max": e.temp_max,
                    "pressure": 1016,
                    "humidity": e.humidity
                },
                "weather": [{"id": 800, "main": "Clear", "description": "céu limpo", "icon": "01d"}],
                "clouds": {"all": 0},
                "wind": {"speed": e.wind_speed, "deg": 320, "gust": e.wind_speed * 1.5},
                "visibility": 10000,
                "pop": 0,
                "dt_txt": e.timestamp
            })
        })
        .collect();

    json!({
        "cod": "200",
        "message": 0,
        "cnt": list.len(),
        "list": list,
        "city": {"id": 2267057, "name": "Lisboa", "country": "PT"}
    })
    .to_string()
}

/// Router answering `/forecast` with `body` when `appid` matches `api_key`, and 401 otherwise.
/// The last query seen is recorded.
pub(crate) fn stub_forecast_router(api_key: &str, body: String) -> (Router, SeenQuery) {
    let seen: SeenQuery = Arc::new(Mutex::new(None));
    let state = (api_key.to_string(), body, seen.clone());

    let router = Router::new()
        .route(
            "/forecast",
            get(
                |State((key, body, seen)): State<(String, String, SeenQuery)>,
                 Query(query): Query<HashMap<String, String>>| async move {
                    let authorised = query.get("appid") == Some(&key);
                    *seen.lock().unwrap() = Some(query);
                    if authorised {
                        (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body)
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            [(header::CONTENT_TYPE, "application/json")],
                            json!({"cod": 401, "message": "Invalid API key."}).to_string(),
                        )
                    }
                },
            ),
        )
        .with_state(state);

    (router, seen)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub upstream address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub upstream stopped");
    });
    format!("http://{addr}")
}

