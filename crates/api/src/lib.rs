//! HTTP API: routing and request/response mapping around the forecast engine.

pub mod app;

/// Listen address override.
pub const ENV_ADDR: &str = "DEMANDCAST_ADDR";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
