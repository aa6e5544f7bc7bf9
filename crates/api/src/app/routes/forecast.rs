use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};

use demandcast_forecast::{ForecastRequest, anomaly_table, attach_actuals};
use demandcast_io::{LoadOptions, forecast_csv_string, load_observations};

use crate::app::{AppState, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/forecast", post(run_forecast))
        .route("/forecast/csv", post(forecast_csv))
        .route("/forecast/merge", post(merge_actuals))
}

pub async fn run_forecast(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::ForecastBody>,
) -> axum::response::Response {
    let request = ForecastRequest {
        history: body.history,
        horizon: body.horizon.unwrap_or(state.settings.horizon),
        date_range: body.date_range,
    };

    match state.engine.run(&request) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            warn!(error = %e, "forecast request rejected");
            errors::forecast_error_to_response(e)
        }
    }
}

/// CSV in, CSV out: the "upload -> forecast -> download" flow.
pub async fn forecast_csv(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<dto::CsvForecastQuery>,
    body: String,
) -> axum::response::Response {
    let loaded = match load_observations(body.as_bytes(), &LoadOptions::strict()) {
        Ok(l) => l,
        Err(e) => return errors::data_error_to_response(e),
    };

    let horizon = query.horizon.unwrap_or(state.settings.horizon);
    let points = match state.engine.forecast(&loaded.observations, horizon) {
        Ok(p) => p,
        Err(e) => return errors::forecast_error_to_response(e),
    };

    let csv = match forecast_csv_string(&points) {
        Ok(s) => s,
        Err(e) => return errors::data_error_to_response(e),
    };

    info!(rows = loaded.rows_read, horizon, "csv forecast exported");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"updated_forecast.csv\""),
        ],
        csv,
    )
        .into_response()
}

pub async fn merge_actuals(Json(body): Json<dto::MergeBody>) -> axum::response::Response {
    if let Some(Err(e)) = body.points.iter().map(|p| p.validate()).find(|r| r.is_err()) {
        return errors::forecast_error_to_response(e);
    }

    match attach_actuals(&body.points, &body.actuals) {
        Ok(points) => {
            let anomalies = anomaly_table(&points);
            (StatusCode::OK, Json(dto::MergeResponse { points, anomalies })).into_response()
        }
        Err(e) => errors::forecast_error_to_response(e),
    }
}
