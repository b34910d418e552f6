//! HTTP surface of the dashboard.

use crate::dashboard::page::DashboardPage;
use crate::dashboard::pipeline::Dashboard;
use crate::dashboard::render::render_html;
use crate::forecast::error::FetchError;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use log::error;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Errors that end a request with a non-200 status instead of a rendered notice.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Upstream forecast unavailable")]
    Upstream(#[from] FetchError),

    #[error("Failed to export forecast as CSV")]
    Export(#[source] polars::error::PolarsError),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        error!("{}: {}", self, self.source_text());
        let status = match &self {
            DashboardError::Upstream(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({ "error": self.to_string(), "detail": self.source_text() });
        (status, Json(body)).into_response()
    }
}

impl DashboardError {
    fn source_text(&self) -> String {
        match self {
            DashboardError::Upstream(e) => e.to_string(),
            DashboardError::Export(e) => e.to_string(),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(dashboard: Dashboard) -> Router {
    let state = AppState {
        dashboard: Arc::new(dashboard),
    };

    Router::new()
        .route("/", get(dashboard_html))
        .route("/api/dashboard", get(dashboard_json))
        .route("/forecast.csv", get(forecast_csv))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn build_page(state: &AppState) -> DashboardPage {
    state.dashboard.build_page(Local::now().date_naive()).await
}

async fn dashboard_html(State(state): State<AppState>) -> Html<String> {
    Html(render_html(&build_page(&state).await))
}

async fn dashboard_json(State(state): State<AppState>) -> Json<DashboardPage> {
    Json(build_page(&state).await)
}

async fn forecast_csv(State(state): State<AppState>) -> Result<Response, DashboardError> {
    let frame = state.dashboard.fetch_frame().await?;
    let csv = frame.to_csv().map_err(DashboardError::Export)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
