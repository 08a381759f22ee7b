// 📦 Product Model - priced items in one of two fixed categories
//
// Prices are kept as integer cents so that sums are exact and comparisons
// against the budget never suffer from floating point drift.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StockError};

/// Display format for load dates in responses
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

// ============================================================================
// PRICE
// ============================================================================

/// Non-negative amount with two fractional digits, stored as cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Build a price from cents. Negative amounts are rejected.
    pub fn from_cents(cents: i64) -> Result<Self> {
        if cents < 0 {
            return Err(StockError::validation(format!(
                "Price cannot be negative: {} cents",
                cents
            )));
        }
        Ok(Price(cents))
    }

    /// Whole currency units, e.g. a budget of 70 → 70.00
    pub fn from_units(units: u32) -> Self {
        Price(i64::from(units) * 100)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Exact sum, or `None` when it does not fit in `i64` cents
    pub fn checked_add(self, rhs: Price) -> Option<Price> {
        self.0.checked_add(rhs.0).map(Price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || StockError::validation(format!("Invalid price: '{}'", s));

        if s.is_empty() || s.starts_with('-') || s.starts_with('+') {
            return Err(invalid());
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Price)
            .ok_or_else(invalid)
    }
}

impl TryFrom<f64> for Price {
    type Error = StockError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(StockError::validation(format!("Invalid price: {}", value)));
        }

        let scaled = value * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-6 {
            return Err(StockError::validation(format!(
                "Price must have at most two decimal places: {}",
                value
            )));
        }
        if cents > i64::MAX as f64 {
            return Err(StockError::validation(format!("Price out of range: {}", value)));
        }

        Ok(Price(cents as i64))
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> f64 {
        price.0 as f64 / 100.0
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// First pool of the pair
    #[serde(rename = "PRODUNO")]
    ProdUno,

    /// Second pool of the pair
    #[serde(rename = "PRODDOS")]
    ProdDos,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProdUno => "PRODUNO",
            Category::ProdDos => "PRODDOS",
        }
    }

    pub fn all() -> [Category; 2] {
        [Category::ProdUno, Category::ProdDos]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRODUNO" => Ok(Category::ProdUno),
            "PRODDOS" => Ok(Category::ProdDos),
            _ => Err(StockError::validation("Category must be PRODUNO or PRODDOS")),
        }
    }
}

// ============================================================================
// PRODUCT
// ============================================================================

/// Stored product. Read-only snapshot as far as pair selection is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub price: Price,
    pub load_date: NaiveDate,
    pub category: Category,
}

/// Validated product data, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub price: Price,
    pub load_date: NaiveDate,
    pub category: Category,
}

impl NewProduct {
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            price: self.price,
            load_date: self.load_date,
            category: self.category,
        }
    }
}

/// Create/update input as it arrives from the CLI, CSV or HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    pub price: Price,
    pub load_date: NaiveDate,
    pub category: String,
}

impl ProductRequest {
    /// Minimum accepted price: 0.01
    pub const MIN_PRICE_CENTS: i64 = 1;

    pub fn validate(&self) -> Result<NewProduct> {
        if self.price.cents() < Self::MIN_PRICE_CENTS {
            return Err(StockError::validation("Price must be greater than 0"));
        }
        let category: Category = self.category.parse()?;

        Ok(NewProduct {
            price: self.price,
            load_date: self.load_date,
            category,
        })
    }
}

/// Product as shown to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub price: Price,
    pub load_date: String,
    pub category: Category,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            price: product.price,
            load_date: product.load_date.format(DISPLAY_DATE_FORMAT).to_string(),
            category: product.category,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse::from(&product)
    }
}
