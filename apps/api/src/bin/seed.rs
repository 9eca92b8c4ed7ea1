//! # Seed Data
//!
//! Creates the reference data a fresh Stockroom database starts with.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by stockroom.toml / STOCKROOM_DATABASE_PATH
//! cargo run -p stockroom-api --bin seed
//!
//! # Specify database path
//! cargo run -p stockroom-api --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Created (only when missing, so re-running is safe)
//! - Categories: Electronics, Clothing, Books, Home & Garden
//! - Suppliers: Tech Supplies Co., Fashion Wholesale Ltd., Book Distributors Inc.
//! - Superuser `STOCKROOM_ADMIN_EMAIL` (default admin@example.com) with
//!   password `STOCKROOM_ADMIN_PASSWORD` (default "admin")

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use stockroom_api::password::hash_password;
use stockroom_api::ServerConfig;
use stockroom_core::{CategoryCreate, NewUser, SupplierCreate};
use stockroom_db::{Database, DbConfig};

/// (name, description)
const CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "Electronic devices and accessories"),
    ("Clothing", "Apparel and fashion items"),
    ("Books", "Books and publications"),
    ("Home & Garden", "Home improvement and garden supplies"),
];

/// (name, contact, email, phone, address)
const SUPPLIERS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Tech Supplies Co.",
        "John Smith",
        "john@techsupplies.com",
        "123-456-7890",
        "123 Tech Street",
    ),
    (
        "Fashion Wholesale Ltd.",
        "Jane Doe",
        "jane@fashionwholesale.com",
        "098-765-4321",
        "456 Fashion Avenue",
    ),
    (
        "Book Distributors Inc.",
        "Bob Johnson",
        "bob@bookdist.com",
        "555-123-4567",
        "789 Book Lane",
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: from configuration)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db_path = match db_path {
        Some(path) => path,
        None => {
            ServerConfig::load()
                .context("Failed to load configuration")?
                .database_path
        }
    };

    println!("🌱 Stockroom Seed Data");
    println!("======================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();

    let categories = db.categories();
    for (name, description) in CATEGORIES {
        if categories.get_by_name(name).await?.is_some() {
            continue;
        }
        categories
            .create(CategoryCreate {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        println!("  Created category: {name}");
    }

    let suppliers = db.suppliers();
    for (name, contact, email, phone, address) in SUPPLIERS {
        if suppliers.get_by_name(name).await?.is_some() {
            continue;
        }
        suppliers
            .create(SupplierCreate {
                name: name.to_string(),
                contact_name: Some(contact.to_string()),
                email: Some(email.to_string()),
                phone: Some(phone.to_string()),
                address: Some(address.to_string()),
            })
            .await?;
        println!("  Created supplier: {name}");
    }

    let admin_email =
        env::var("STOCKROOM_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    if db.users().get_by_email(&admin_email).await?.is_none() {
        let password =
            env::var("STOCKROOM_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        db.users()
            .create(NewUser {
                email: admin_email.clone(),
                hashed_password: hash_password(&password)?,
                full_name: Some("Administrator".to_string()),
                is_active: true,
                is_superuser: true,
            })
            .await?;
        println!("  Created superuser: {admin_email}");
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
