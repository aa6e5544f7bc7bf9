//! HTTP API application wiring (Axum router + shared engine).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use demandcast_core::ForecastResult;
use demandcast_forecast::{ForecastEngine, Settings};

pub mod dto;
pub mod errors;
pub mod routes;

/// Read-only state shared by every handler.
#[derive(Debug)]
pub struct AppState {
    pub engine: ForecastEngine,
    pub settings: Settings,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(settings: Settings) -> ForecastResult<Router> {
    let engine = ForecastEngine::new(settings.forecast)?;
    let state = Arc::new(AppState { engine, settings });

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(state))))
}
