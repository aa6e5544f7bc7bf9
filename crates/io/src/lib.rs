//! `demandcast-io` — tabular boundaries of the forecaster.
//!
//! Loading validates at the edge: everything past `load_observations` works with
//! typed `DemandObservation`s, never with string-keyed columns.

pub mod error;
pub mod export;
pub mod generate;
pub mod loader;

pub use error::{DataError, DataResult};
pub use export::{
    FORECAST_COLUMNS, forecast_csv_string, read_forecast_csv, write_forecast_csv,
    write_inventory_csv, write_risk_overlay_csv, write_timeline_csv,
};
pub use generate::{GeneratorConfig, SupplyChainRecord, generate_dataset, write_dataset_csv};
pub use loader::{
    LoadOptions, LoadedSeries, RowError, load_observations, load_observations_from_path, parse_date,
};
