// Stock Pairing - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod budget;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod product;
pub mod selector;
pub mod service;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use budget::{Budget, BudgetLimits};
pub use config::AppConfig;
pub use db::{
    count_products, fetch_by_category_with_max_price, get_all_products, open_database,
    setup_database,
};
pub use error::{Result, StockError};
pub use product::{Category, NewProduct, Price, Product, ProductRequest, ProductResponse};
pub use selector::{select_best_pair, select_best_pair_sorted, PairSelection, SelectionKind};
pub use service::{find_best_pair, FilteredProductsResponse};
