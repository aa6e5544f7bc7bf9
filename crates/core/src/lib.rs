//! `demandcast-core` — demand forecasting data model.
//!
//! This crate contains **pure** record types and validation (no IO, no fitting).

pub mod context;
pub mod error;
pub mod id;
pub mod observation;
pub mod point;
pub mod risk;
pub mod value_object;

pub use context::{ContextColumn, SupplyContext};
pub use error::{ForecastError, ForecastResult};
pub use id::BatchId;
pub use observation::{DemandObservation, validate_history};
pub use point::ForecastPoint;
pub use risk::{RiskLevel, RiskThresholds};
pub use value_object::ValueObject;
