//! # Seed Data
//!
//! Loads the sample catalog into an empty database.
//!
//! ## Usage
//! ```bash
//! cargo run -p locker-db --bin seed
//! cargo run -p locker-db --bin seed -- --db ./data/locker.db
//! ```
//!
//! ## Sample Catalog
//! | Product      | Type     | Size | Barcode   | Cost  | Price | Stock |
//! |--------------|----------|------|-----------|-------|-------|-------|
//! | Team Jersey  | Home     | M    | 123456789 | 49.99 | 79.99 | 10    |
//! | Team Jersey  | Home     | L    | 123456790 | 49.99 | 79.99 | 0     |
//! | Team Jersey  | Away     | S    | 987654321 | 59.99 | 89.99 | 5     |
//! | Practice Kit | Training | M    | 111222333 | 39.99 | 69.99 | 8     |

use std::env;

use locker_core::NewVariant;
use locker_db::{Database, DbConfig};

/// (product, [(type, size, barcode, cost, price, stock)])
type SampleProduct = (&'static str, &'static [(&'static str, &'static str, &'static str, i64, i64, i64)]);

const SAMPLE_CATALOG: &[SampleProduct] = &[
    (
        "Team Jersey",
        &[
            ("Home", "M", "123456789", 4999, 7999, 10),
            ("Home", "L", "123456790", 4999, 7999, 0),
            ("Away", "S", "987654321", 5999, 8999, 5),
        ],
    ),
    (
        "Practice Kit",
        &[("Training", "M", "111222333", 3999, 6999, 8)],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("LOCKER_DB_PATH").unwrap_or_else(|_| String::from("./locker.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Locker Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $LOCKER_DB_PATH or ./locker.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Locker Seed Data");
    println!("================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count_products().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    for (name, variants) in SAMPLE_CATALOG {
        let drafts: Vec<NewVariant> = variants
            .iter()
            .map(|(variant_type, size, barcode, cost, price, stock)| NewVariant {
                barcode: barcode.to_string(),
                variant_type: variant_type.to_string(),
                size: size.to_string(),
                cost_cents: *cost,
                selling_price_cents: *price,
                stock: *stock,
                photo: None,
            })
            .collect();

        let entry = db.catalog().create_product_with_variants(name, &drafts).await?;
        println!("  + {} ({} variants)", entry.product.name, entry.variants.len());
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
