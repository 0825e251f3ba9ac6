use crate::models::responses::HealthResponse;
use crate::AppState;
use axum::{extract::State, response::Json};
use chrono::Utc;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "booklist-service".to_string(),
        status: "running".to_string(),
        backend: state.backend.name().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
