use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use demandcast_core::{DemandObservation, ForecastError, SupplyContext};
use demandcast_io::DataError;

pub fn forecast_error_to_response(err: ForecastError) -> Response {
    let status = match err {
        ForecastError::DegenerateFit(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::InsufficientData { .. }
        | ForecastError::InvalidHorizon(_)
        | ForecastError::UnsortedInput { .. }
        | ForecastError::InvalidObservation(_)
        | ForecastError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn data_error_to_response(err: DataError) -> Response {
    let (status, code) = match err {
        DataError::MissingColumn(_) => (StatusCode::BAD_REQUEST, "missing_column"),
        DataError::Row { .. } => (StatusCode::BAD_REQUEST, "invalid_row"),
        DataError::Csv(_) => (StatusCode::BAD_REQUEST, "malformed_csv"),
        DataError::Io { .. } | DataError::Generator(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };
    json_error(status, code, err.to_string())
}

/// Reject JSON rows that would not have passed the CSV loader.
pub fn validate_rows(
    history: &[DemandObservation],
    context: &[SupplyContext],
) -> Result<(), Response> {
    history
        .iter()
        .try_for_each(DemandObservation::validate)
        .and_then(|_| context.iter().try_for_each(SupplyContext::validate))
        .map_err(forecast_error_to_response)
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
