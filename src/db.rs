use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, StockError};
use crate::product::{Category, NewProduct, Price, Product, ProductRequest};

/// Storage format for `load_date`
const DB_DATE_FORMAT: &str = "%Y-%m-%d";

const PRODUCT_COLUMNS: &str = "id, price_cents, load_date, category";

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Products Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
            load_date TEXT NOT NULL,
            category TEXT NOT NULL CHECK (category IN ('PRODUNO', 'PRODDOS')),
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_category_price ON products(category, price_cents)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_load_date ON products(load_date)",
        [],
    )?;

    Ok(())
}

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    setup_database(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let price_cents: i64 = row.get(1)?;
    let load_date: String = row.get(2)?;
    let category: String = row.get(3)?;

    Ok(Product {
        id: row.get(0)?,
        price: Price::from_cents(price_cents)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(e)))?,
        load_date: NaiveDate::parse_from_str(&load_date, DB_DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        category: category
            .parse::<Category>()
            .map_err(|e: StockError| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
    })
}

// ============================================================================
// CRUD
// ============================================================================

pub fn insert_product(conn: &Connection, product: &NewProduct) -> Result<Product> {
    conn.execute(
        "INSERT INTO products (price_cents, load_date, category) VALUES (?1, ?2, ?3)",
        params![
            product.price.cents(),
            product.load_date.format(DB_DATE_FORMAT).to_string(),
            product.category.as_str(),
        ],
    )?;

    Ok(product.clone().with_id(conn.last_insert_rowid()))
}

/// Insert many products in a single transaction; all or nothing
pub fn insert_products(conn: &mut Connection, products: &[NewProduct]) -> Result<Vec<Product>> {
    let tx = conn.transaction()?;
    let mut inserted = Vec::with_capacity(products.len());

    for product in products {
        inserted.push(insert_product(&tx, product)?);
    }

    tx.commit()?;
    info!(count = inserted.len(), "products inserted");

    Ok(inserted)
}

pub fn get_product(conn: &Connection, id: i64) -> Result<Option<Product>> {
    let product = conn
        .query_row(
            &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
            [id],
            product_from_row,
        )
        .optional()?;

    Ok(product)
}

/// Returns `None` when no product has this id
pub fn update_product(conn: &Connection, id: i64, product: &NewProduct) -> Result<Option<Product>> {
    let changed = conn.execute(
        "UPDATE products SET price_cents = ?1, load_date = ?2, category = ?3 WHERE id = ?4",
        params![
            product.price.cents(),
            product.load_date.format(DB_DATE_FORMAT).to_string(),
            product.category.as_str(),
            id,
        ],
    )?;

    if changed == 0 {
        return Ok(None);
    }

    Ok(Some(product.clone().with_id(id)))
}

/// Returns `false` when no product has this id
pub fn delete_product(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

/// All products, most recently loaded first
pub fn get_all_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM products ORDER BY load_date DESC, id DESC",
        PRODUCT_COLUMNS
    ))?;

    let products = stmt
        .query_map([], product_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(products)
}

pub fn count_products(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// POOL QUERY
// ============================================================================

/// One category's products priced at or below `max_price`.
///
/// Ordered by price descending, then id ascending. Pair selection breaks ties
/// by this order, so it must stay stable.
pub fn fetch_by_category_with_max_price(
    conn: &Connection,
    category: Category,
    max_price: Price,
) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM products
         WHERE category = ?1 AND price_cents <= ?2
         ORDER BY price_cents DESC, id ASC",
        PRODUCT_COLUMNS
    ))?;

    let products = stmt
        .query_map(params![category.as_str(), max_price.cents()], product_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(products)
}

// ============================================================================
// CSV IMPORT
// ============================================================================

/// Read `price,load_date,category` rows. Rows are not validated here.
pub fn load_csv(csv_path: &Path) -> Result<Vec<ProductRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)?;

    let mut requests = Vec::new();

    for result in rdr.deserialize() {
        let request: ProductRequest = result?;
        requests.push(request);
    }

    Ok(requests)
}
