//! `demandcast-forecast`
//!
//! **Responsibility:** the forecast engine and the data products derived from it.
//!
//! - Pure computation: no IO, no shared mutable state.
//! - Inputs are validated histories; outputs are immutable forecast batches.
//! - Anomalies only appear once actuals are attached (`merge`).

pub mod band;
pub mod config;
pub mod engine;
pub mod merge;
pub mod pipeline;
pub mod summary;
pub mod trend;
pub mod view;

pub use band::BandPolicy;
pub use config::{ForecastConfig, Settings};
pub use engine::{ForecastEngine, forecast};
pub use merge::attach_actuals;
pub use pipeline::{ForecastRequest, ForecastResponse};
pub use summary::{ColumnSummary, DemandSummary, summarize, summarize_with_context};
pub use trend::TrendFit;
pub use view::{
    DateRange, FlaggedRow, InventoryRow, RiskCounts, RiskRow, TimelineRow, anomaly_table,
    combine_timeline, filter_points, filter_timeline, inventory_vs_demand, risk_overlay, risk_table,
};
