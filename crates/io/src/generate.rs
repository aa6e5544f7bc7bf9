//! Synthetic supply-chain dataset generator (demo and test data).

use std::io::Write;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Number of consecutive days to emit.
    pub days: usize,
    /// Date of the last row.
    pub end_date: NaiveDate,
    pub seed: u64,
    /// Mean supplier delay (Poisson lambda).
    pub mean_delay_days: f64,
    /// Probability that a row is flagged risky.
    pub risk_probability: f64,
}

impl GeneratorConfig {
    pub fn new(days: usize, end_date: NaiveDate, seed: u64) -> Self {
        Self {
            days,
            end_date,
            seed,
            mean_delay_days: 2.0,
            risk_probability: 0.15,
        }
    }
}

/// One generated row (`demand` feeds the forecast; the rest is context).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainRecord {
    pub date: NaiveDate,
    pub demand: u32,
    pub inventory_level: u32,
    pub supplier_score: u32,
    pub delay_days: u64,
    pub risk_flag: u8,
}

pub fn generate_dataset(cfg: &GeneratorConfig) -> DataResult<Vec<SupplyChainRecord>> {
    if cfg.days == 0 {
        return Err(DataError::Generator("days must be at least 1".to_string()));
    }
    if !(0.0..=1.0).contains(&cfg.risk_probability) {
        return Err(DataError::Generator(format!(
            "risk probability must be within [0, 1], got {}",
            cfg.risk_probability
        )));
    }
    let delays = Poisson::new(cfg.mean_delay_days).map_err(|e| {
        DataError::Generator(format!("invalid mean delay {}: {e}", cfg.mean_delay_days))
    })?;
    let start = cfg
        .end_date
        .checked_sub_days(Days::new(cfg.days as u64 - 1))
        .ok_or_else(|| {
            DataError::Generator(format!(
                "{} days before {} is out of range",
                cfg.days, cfg.end_date
            ))
        })?;

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let records = (0..cfg.days as u64)
        .map(|i| SupplyChainRecord {
            date: start + Days::new(i),
            demand: rng.gen_range(50..500),
            inventory_level: rng.gen_range(100..1000),
            supplier_score: rng.gen_range(40..100),
            delay_days: delays.sample(&mut rng) as u64,
            risk_flag: u8::from(rng.gen_bool(cfg.risk_probability)),
        })
        .collect();

    Ok(records)
}

pub fn write_dataset_csv<W: Write>(writer: W, records: &[SupplyChainRecord]) -> DataResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| DataError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, load_observations};
    use demandcast_core::ContextColumn;

    fn cfg(seed: u64) -> GeneratorConfig {
        GeneratorConfig::new(100, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(), seed)
    }

    #[test]
    fn rows_are_daily_and_within_ranges() {
        let rows = generate_dataset(&cfg(7)).unwrap();

        assert_eq!(rows.len(), 100);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 3, 23).unwrap());
        assert_eq!(rows[99].date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        for r in &rows {
            assert!((50..500).contains(&r.demand));
            assert!((100..1000).contains(&r.inventory_level));
            assert!((40..100).contains(&r.supplier_score));
            assert!(r.risk_flag <= 1);
        }
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate_dataset(&cfg(42)).unwrap(), generate_dataset(&cfg(42)).unwrap());
        assert_ne!(generate_dataset(&cfg(1)).unwrap(), generate_dataset(&cfg(2)).unwrap());
    }

    #[test]
    fn generated_csv_loads_as_history() {
        let rows = generate_dataset(&cfg(3)).unwrap();
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &rows).unwrap();

        let loaded = load_observations(buf.as_slice(), &LoadOptions::strict()).unwrap();
        assert_eq!(loaded.observations.len(), 100);
        assert_eq!(loaded.observations[0].actual_demand, Some(rows[0].demand as f64));
        assert_eq!(loaded.context_columns, ContextColumn::ALL.to_vec());
        assert_eq!(loaded.context[0].inventory_level, Some(rows[0].inventory_level as f64));
        assert_eq!(loaded.context[0].delay_days, Some(rows[0].delay_days as f64));
        assert_eq!(loaded.context[0].risk_flag, Some(rows[0].risk_flag == 1));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut bad = cfg(0);
        bad.days = 0;
        assert!(matches!(generate_dataset(&bad), Err(DataError::Generator(_))));

        let mut bad = cfg(0);
        bad.mean_delay_days = -1.0;
        assert!(generate_dataset(&bad).is_err());

        let mut bad = cfg(0);
        bad.risk_probability = 1.5;
        assert!(generate_dataset(&bad).is_err());
    }
}
