use axum::{
    Router,
    routing::{get, post},
};

pub mod forecast;
pub mod overlay;
pub mod summary;
pub mod system;

/// Router for all forecasting endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/config", get(system::config))
        .merge(forecast::router())
        .merge(overlay::router())
        .route("/summary", post(summary::summarize))
}
