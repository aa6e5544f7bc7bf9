use axum::{Json, http::StatusCode, response::IntoResponse};

use demandcast_core::ContextColumn;
use demandcast_forecast::summarize_with_context;

use crate::app::{dto, errors};

/// Missing values and statistics for demand and any supplied context columns.
pub async fn summarize(Json(body): Json<dto::SummaryBody>) -> axum::response::Response {
    if let Err(resp) = errors::validate_rows(&body.history, &body.context) {
        return resp;
    }

    let columns = ContextColumn::present_in(&body.context);
    let summary = summarize_with_context(&body.history, &body.context, &columns);
    (StatusCode::OK, Json(summary)).into_response()
}
