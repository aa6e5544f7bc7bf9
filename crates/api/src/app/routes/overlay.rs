use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use demandcast_forecast::{combine_timeline, inventory_vs_demand, risk_overlay};

use crate::app::{AppState, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/overlay/risk", post(risk))
        .route("/overlay/inventory", post(inventory))
}

/// History rows the supply chain flagged as risky.
pub async fn risk(Json(body): Json<dto::OverlayBody>) -> Response {
    if let Err(resp) = errors::validate_rows(&body.history, &body.context) {
        return resp;
    }
    (StatusCode::OK, Json(risk_overlay(&body.history, &body.context))).into_response()
}

/// Inventory against demand, optionally extended over a forecast horizon.
pub async fn inventory(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::OverlayBody>,
) -> Response {
    if let Err(resp) = errors::validate_rows(&body.history, &body.context) {
        return resp;
    }

    let points = match body.horizon {
        Some(horizon) => match state.engine.forecast(&body.history, horizon) {
            Ok(points) => points,
            Err(e) => return errors::forecast_error_to_response(e),
        },
        None => Vec::new(),
    };

    let timeline = combine_timeline(&body.history, &points);
    (StatusCode::OK, Json(inventory_vs_demand(&timeline, &body.context))).into_response()
}
