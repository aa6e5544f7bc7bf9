use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::value_object::ValueObject;

/// Optional supply-chain columns that can travel alongside demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextColumn {
    InventoryLevel,
    SupplierScore,
    DelayDays,
    RiskFlag,
}

impl ContextColumn {
    pub const ALL: [ContextColumn; 4] = [
        ContextColumn::InventoryLevel,
        ContextColumn::SupplierScore,
        ContextColumn::DelayDays,
        ContextColumn::RiskFlag,
    ];

    /// Column name as it appears in CSV headers and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ContextColumn::InventoryLevel => "inventory_level",
            ContextColumn::SupplierScore => "supplier_score",
            ContextColumn::DelayDays => "delay_days",
            ContextColumn::RiskFlag => "risk_flag",
        }
    }

    /// Columns with at least one value in `rows`, in canonical order.
    pub fn present_in(rows: &[SupplyContext]) -> Vec<ContextColumn> {
        Self::ALL
            .into_iter()
            .filter(|c| rows.iter().any(|r| r.value(*c).is_some()))
            .collect()
    }
}

impl core::fmt::Display for ContextColumn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supply-chain context recorded on a date. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyContext {
    pub date: NaiveDate,
    #[serde(default)]
    pub inventory_level: Option<f64>,
    #[serde(default)]
    pub supplier_score: Option<f64>,
    #[serde(default)]
    pub delay_days: Option<f64>,
    #[serde(default)]
    pub risk_flag: Option<bool>,
}

impl ValueObject for SupplyContext {}

impl SupplyContext {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            inventory_level: None,
            supplier_score: None,
            delay_days: None,
            risk_flag: None,
        }
    }

    /// Numeric view of one column (`risk_flag` reads as 0 or 1).
    pub fn value(&self, column: ContextColumn) -> Option<f64> {
        match column {
            ContextColumn::InventoryLevel => self.inventory_level,
            ContextColumn::SupplierScore => self.supplier_score,
            ContextColumn::DelayDays => self.delay_days,
            ContextColumn::RiskFlag => self.risk_flag.map(|f| if f { 1.0 } else { 0.0 }),
        }
    }

    pub fn is_risk_flagged(&self) -> bool {
        self.risk_flag == Some(true)
    }

    /// Numeric columns, when present, must be finite and non-negative.
    pub fn validate(&self) -> ForecastResult<()> {
        for column in [
            ContextColumn::InventoryLevel,
            ContextColumn::SupplierScore,
            ContextColumn::DelayDays,
        ] {
            match self.value(column) {
                Some(v) if !v.is_finite() || v < 0.0 => {
                    return Err(ForecastError::invalid_observation(format!(
                        "{column} on {} must be a finite, non-negative number (got {v})",
                        self.date
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
