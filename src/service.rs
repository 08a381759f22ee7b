// Product operations used by both the CLI and the HTTP server.
//
// Thin layer over db.rs: validates requests, logs mutations and turns a pair
// selection into a caller-facing response.

use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::budget::Budget;
use crate::db;
use crate::error::{Result, StockError};
use crate::product::{Category, Price, ProductRequest, ProductResponse};
use crate::selector::{select_best_pair, PairSelection, SelectionKind};

/// Best pair for a budget, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredProductsResponse {
    pub product_one: Option<ProductResponse>,
    pub product_two: Option<ProductResponse>,
    pub total: Price,
    pub outcome: SelectionKind,
    pub message: String,
}

impl<'a> From<PairSelection<'a>> for FilteredProductsResponse {
    fn from(selection: PairSelection<'a>) -> Self {
        let (product_one, product_two) = match selection.pair() {
            Some((first, second)) => (
                Some(ProductResponse::from(first)),
                Some(ProductResponse::from(second)),
            ),
            None => (None, None),
        };

        Self {
            product_one,
            product_two,
            total: selection.total().unwrap_or(Price::ZERO),
            outcome: selection.kind(),
            message: selection.message().to_string(),
        }
    }
}

pub fn list_products(conn: &Connection) -> Result<Vec<ProductResponse>> {
    let products = db::get_all_products(conn)?;
    Ok(products.into_iter().map(ProductResponse::from).collect())
}

pub fn get_product(conn: &Connection, id: i64) -> Result<ProductResponse> {
    db::get_product(conn, id)?
        .map(ProductResponse::from)
        .ok_or(StockError::NotFound { id })
}

pub fn create_product(conn: &Connection, request: &ProductRequest) -> Result<ProductResponse> {
    let product = db::insert_product(conn, &request.validate()?)?;

    info!(product_id = product.id, "product created");
    Ok(product.into())
}

pub fn update_product(conn: &Connection, id: i64, request: &ProductRequest) -> Result<ProductResponse> {
    let new_values = request.validate()?;
    let product = db::update_product(conn, id, &new_values)?.ok_or(StockError::NotFound { id })?;

    info!(product_id = id, "product updated");
    Ok(product.into())
}

pub fn delete_product(conn: &Connection, id: i64) -> Result<()> {
    if !db::delete_product(conn, id)? {
        return Err(StockError::NotFound { id });
    }

    info!(product_id = id, "product deleted");
    Ok(())
}

/// Validate every CSV row first, then insert them all in one transaction
pub fn import_csv(conn: &mut Connection, csv_path: &Path) -> Result<usize> {
    let requests = db::load_csv(csv_path)?;

    let products = requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            request.validate().map_err(|e| {
                // header is line 1
                StockError::validation(format!("line {}: {}", index + 2, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let inserted = db::insert_products(conn, &products)?;

    info!(count = inserted.len(), path = %csv_path.display(), "csv imported");
    Ok(inserted.len())
}

/// Pick the best PRODUNO + PRODDOS pair that fits the budget.
///
/// Storage failures come back as `Err`; "no pair" is an `Ok` response with
/// an `outcome` other than `found`.
pub fn find_best_pair(conn: &Connection, budget: Budget) -> Result<FilteredProductsResponse> {
    let cap = budget.as_price();

    let pool_uno = db::fetch_by_category_with_max_price(conn, Category::ProdUno, cap)?;
    let pool_dos = db::fetch_by_category_with_max_price(conn, Category::ProdDos, cap)?;

    let selection = select_best_pair(&pool_uno, &pool_dos, cap);

    match selection {
        PairSelection::Found { first, second, total } => {
            info!(
                budget = budget.value(),
                total = %total,
                produno = first.id,
                proddos = second.id,
                "best pair selected"
            );
        }
        _ => {
            warn!(
                budget = budget.value(),
                produno_candidates = pool_uno.len(),
                proddos_candidates = pool_dos.len(),
                outcome = selection.kind().as_str(),
                "no pair within budget"
            );
        }
    }

    Ok(selection.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetLimits;
    use chrono::NaiveDate;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();
        conn
    }

    fn request(price: &str, category: &str) -> ProductRequest {
        ProductRequest {
            price: price.parse().unwrap(),
            load_date: NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
            category: category.to_string(),
        }
    }

    fn budget(value: i64) -> Budget {
        Budget::new(value, &BudgetLimits::default()).unwrap()
    }

    #[test]
    fn test_create_product() {
        let conn = test_db();

        let result = create_product(&conn, &request("100.50", "PRODUNO")).unwrap();

        assert_eq!(result.price.to_string(), "100.50");
        assert_eq!(result.load_date, "12/02/2026");
        assert_eq!(result.category, Category::ProdUno);
        assert_eq!(db::count_products(&conn).unwrap(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_request() {
        let conn = test_db();

        let err = create_product(&conn, &request("10", "PRODTRES")).unwrap_err();

        assert!(matches!(err, StockError::Validation { .. }));
        assert_eq!(db::count_products(&conn).unwrap(), 0);
    }

    #[test]
    fn test_update_and_delete() {
        let conn = test_db();
        let created = create_product(&conn, &request("50", "PRODUNO")).unwrap();

        let updated = update_product(&conn, created.id, &request("75", "PRODDOS")).unwrap();
        assert_eq!(updated.price, Price::from_units(75));
        assert_eq!(updated.category, Category::ProdDos);

        delete_product(&conn, created.id).unwrap();
        assert!(matches!(
            get_product(&conn, created.id),
            Err(StockError::NotFound { .. })
        ));
        assert!(matches!(
            delete_product(&conn, created.id),
            Err(StockError::NotFound { .. })
        ));
        assert!(matches!(
            update_product(&conn, created.id, &request("1", "PRODUNO")),
            Err(StockError::NotFound { .. })
        ));
    }

    #[test]
    fn test_best_combination() {
        let conn = test_db();
        create_product(&conn, &request("10", "PRODDOS")).unwrap();
        create_product(&conn, &request("60", "PRODUNO")).unwrap();
        create_product(&conn, &request("5", "PRODDOS")).unwrap();
        create_product(&conn, &request("5", "PRODUNO")).unwrap();
        create_product(&conn, &request("15", "PRODDOS")).unwrap();

        let result = find_best_pair(&conn, budget(70)).unwrap();

        assert_eq!(result.outcome, SelectionKind::Found);
        assert_eq!(result.product_one.unwrap().price, Price::from_units(60));
        assert_eq!(result.product_two.unwrap().price, Price::from_units(10));
        assert_eq!(result.total, Price::from_units(70));
    }

    #[test]
    fn test_insufficient_budget_is_empty_pool() {
        let conn = test_db();
        create_product(&conn, &request("100", "PRODDOS")).unwrap();
        create_product(&conn, &request("100", "PRODUNO")).unwrap();

        // Both pools are filtered to nothing before pairing
        let result = find_best_pair(&conn, budget(50)).unwrap();

        assert_eq!(result.outcome, SelectionKind::EmptyPool);
        assert!(result.product_one.is_none());
        assert!(result.product_two.is_none());
        assert_eq!(result.total, Price::ZERO);
        assert!(result.message.starts_with("No combination available"));
    }

    #[test]
    fn test_pools_present_but_no_pair_fits() {
        let conn = test_db();
        create_product(&conn, &request("40", "PRODUNO")).unwrap();
        create_product(&conn, &request("30", "PRODDOS")).unwrap();

        let result = find_best_pair(&conn, budget(50)).unwrap();

        assert_eq!(result.outcome, SelectionKind::NoAffordableCombination);
        assert_eq!(result.message, "No combination found that does not exceed the budget.");
    }

    #[test]
    fn test_tie_prefers_lower_id() {
        let conn = test_db();
        let first = create_product(&conn, &request("50", "PRODUNO")).unwrap();
        create_product(&conn, &request("50", "PRODUNO")).unwrap();
        create_product(&conn, &request("20", "PRODDOS")).unwrap();

        let result = find_best_pair(&conn, budget(70)).unwrap();

        assert_eq!(result.product_one.unwrap().id, first.id);
    }

    #[test]
    fn test_import_csv_rejects_bad_row() {
        use std::io::Write;

        let mut conn = test_db();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "price,load_date,category").unwrap();
        writeln!(file, "10,2026-01-01,PRODUNO").unwrap();
        writeln!(file, "0,2026-01-01,PRODDOS").unwrap();
        file.flush().unwrap();

        let err = import_csv(&mut conn, file.path()).unwrap_err();

        assert!(err.to_string().contains("line 3"));
        assert_eq!(db::count_products(&conn).unwrap(), 0);
    }
}
