// Error types for the stock pairing library.
//
// "No affordable pair" is not an error: see selector::PairSelection.
// Everything here is an infrastructure or input failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Product with ID {id} not found")]
    NotFound { id: i64 },

    #[error("Database lock poisoned")]
    Lock,
}

impl StockError {
    pub fn validation(message: impl Into<String>) -> Self {
        StockError::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        StockError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StockError>;
