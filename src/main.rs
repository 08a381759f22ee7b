use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;

use stock_pairing::service::{self, FilteredProductsResponse};
use stock_pairing::{logging, open_database, AppConfig, Budget, Price, ProductRequest, ProductResponse};

#[derive(Debug, Parser)]
#[command(name = "stock-pairing", version, about = "Manage products and find the best pair within a budget")]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database path (overrides config and STOCK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database schema
    Init,

    /// Add a product
    Add {
        #[arg(long)]
        price: Price,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// PRODUNO or PRODDOS
        #[arg(long)]
        category: String,
    },

    /// Replace a product's values
    Update {
        id: i64,
        #[arg(long)]
        price: Price,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        category: String,
    },

    /// Delete a product
    Remove { id: i64 },

    /// List all products, newest first
    List,

    /// Show one product
    Show { id: i64 },

    /// Import products from a CSV file with columns price,load_date,category
    Import { csv: PathBuf },

    /// Find the best PRODUNO + PRODDOS pair within a budget
    Pair {
        #[arg(long)]
        budget: i64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    logging::init_logger(&config.logging, cli.verbose);

    let mut conn = open_database(&config.database.path)
        .with_context(|| format!("Failed to open database at {}", config.database.path.display()))?;

    match cli.command {
        Command::Init => {
            println!("✓ Database initialized at {}", config.database.path.display());
        }
        Command::Add { price, date, category } => {
            let product = service::create_product(&conn, &request(price, date, category))?;
            println!("✓ Created product {}", product.id);
            print_products(&[product]);
        }
        Command::Update { id, price, date, category } => {
            let product = service::update_product(&conn, id, &request(price, date, category))?;
            println!("✓ Updated product {}", product.id);
            print_products(&[product]);
        }
        Command::Remove { id } => {
            service::delete_product(&conn, id)?;
            println!("✓ Deleted product {}", id);
        }
        Command::List => {
            let products = service::list_products(&conn)?;
            print_products(&products);
            println!("{} products", products.len());
        }
        Command::Show { id } => {
            print_products(&[service::get_product(&conn, id)?]);
        }
        Command::Import { csv } => {
            let count = service::import_csv(&mut conn, &csv)
                .with_context(|| format!("Failed to import {}", csv.display()))?;
            println!("✓ Imported {} products", count);
        }
        Command::Pair { budget, json } => run_pair(&conn, &config, budget, json)?,
    }

    Ok(())
}

fn request(price: Price, date: Option<NaiveDate>, category: String) -> ProductRequest {
    ProductRequest {
        price,
        load_date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        category,
    }
}

fn run_pair(conn: &Connection, config: &AppConfig, budget: i64, json: bool) -> Result<()> {
    let budget = Budget::new(budget, &config.budget)?;
    let result = service::find_best_pair(conn, budget)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_pair(&result);
    Ok(())
}

fn print_pair(result: &FilteredProductsResponse) {
    match (&result.product_one, &result.product_two) {
        (Some(one), Some(two)) => {
            println!("{}", result.message);
            print_products(&[one.clone(), two.clone()]);
            println!("Total: {}", result.total);
        }
        _ => println!("{} ({})", result.message, result.outcome.as_str()),
    }
}

fn print_products(products: &[ProductResponse]) {
    println!("{:>6}  {:>12}  {:<10}  {}", "ID", "PRICE", "LOADED", "CATEGORY");
    for p in products {
        println!("{:>6}  {:>12}  {:<10}  {}", p.id, p.price.to_string(), p.load_date, p.category);
    }
}
