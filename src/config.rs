// Configuration loading
//
// Layering: built-in defaults < optional TOML file < environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::budget::BudgetLimits;
use crate::error::{Result, StockError};

pub const ENV_DB_PATH: &str = "STOCK_DB_PATH";
pub const ENV_BIND_ADDR: &str = "STOCK_BIND_ADDR";
pub const ENV_LOG_LEVEL: &str = "STOCK_LOG_LEVEL";

// =============================================================================
// Configuration Types
// =============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub budget: BudgetLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, created on first use
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("products.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl AppConfig {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then the file (if any), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "loading config file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// `lookup` is injectable so tests don't touch the process environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            info!("{} set, using database {}", ENV_DB_PATH, path);
            self.database.path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            info!("{} set, binding to {}", ENV_BIND_ADDR, addr);
            self.server.bind_addr = addr;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(StockError::config("database.path cannot be empty"));
        }
        if self.server.bind_addr.trim().is_empty() {
            return Err(StockError::config("server.bind_addr cannot be empty"));
        }
        if self.budget.min < 1 {
            return Err(StockError::config("budget.min must be at least 1"));
        }
        if self.budget.min > self.budget.max {
            warn!(min = self.budget.min, max = self.budget.max, "inverted budget range");
            return Err(StockError::config(format!(
                "budget.min ({}) cannot exceed budget.max ({})",
                self.budget.min, self.budget.max
            )));
        }

        Ok(())
    }
}
