use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::AppState;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Effective engine settings (band policy, thresholds, default horizon).
pub async fn config(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.settings)
}
