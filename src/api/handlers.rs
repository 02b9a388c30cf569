use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::fares::Fare;
use crate::monitor::MonitorConfig;
use crate::report::{BoardSnapshot, StatusBoard};

/// Application state shared across handlers
pub struct AppState {
    pub board: Arc<StatusBoard>,
    pub config: Arc<MonitorConfig>,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Status
// ============================================================================

/// Public view of the monitor config. Notification targets are listed by
/// kind only since their URLs, headers and credentials are secrets.
#[derive(Serialize)]
pub struct ConfigView {
    pub origin: String,
    pub destination: String,
    pub outbound_date: NaiveDate,
    pub return_date: NaiveDate,
    pub passengers: u32,
    pub interval_minutes: f64,
    pub deal_threshold: Option<Fare>,
    pub source_url: String,
    pub targets: Vec<&'static str>,
}

impl From<&MonitorConfig> for ConfigView {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            origin: config.origin.clone(),
            destination: config.destination.clone(),
            outbound_date: config.outbound_date,
            return_date: config.return_date,
            passengers: config.passengers,
            interval_minutes: config.interval_minutes(),
            deal_threshold: config.deal_threshold,
            source_url: config.source_url.clone(),
            targets: config.targets.iter().map(|t| t.kind()).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub config: ConfigView,
    #[serde(flatten)]
    pub board: BoardSnapshot,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        config: ConfigView::from(state.config.as_ref()),
        board: state.board.snapshot(),
    })
}

// ============================================================================
// Settings
// ============================================================================

pub async fn settings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let settings = state.board.snapshot().settings;
    if settings.is_empty() {
        return Err(ApiError::NotFound(
            "Monitor has not reported its settings yet".to_string(),
        ));
    }
    Ok(Json(settings))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
