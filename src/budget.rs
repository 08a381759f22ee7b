// Budget validation
//
// The selector trusts its budget; range checks live here, at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};
use crate::product::Price;

/// Inclusive range of accepted budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLimits {
    #[serde(default = "default_min")]
    pub min: u32,

    #[serde(default = "default_max")]
    pub max: u32,
}

fn default_min() -> u32 {
    1
}

fn default_max() -> u32 {
    1_000_000
}

impl Default for BudgetLimits {
    fn default() -> Self {
        BudgetLimits {
            min: default_min(),
            max: default_max(),
        }
    }
}

impl BudgetLimits {
    pub fn contains(&self, value: i64) -> bool {
        value >= i64::from(self.min) && value <= i64::from(self.max)
    }
}

/// Whole-unit spending budget, already checked against `BudgetLimits`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Budget(u32);

impl Budget {
    pub fn new(value: i64, limits: &BudgetLimits) -> Result<Self> {
        if !limits.contains(value) {
            return Err(StockError::validation(format!(
                "Budget must be between {} and {}",
                limits.min, limits.max
            )));
        }
        // contains() bounds value to the u32 range of the limits
        Ok(Budget(value as u32))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Budget as a price cap for the selector
    pub fn as_price(&self) -> Price {
        Price::from_units(self.0)
    }
}
