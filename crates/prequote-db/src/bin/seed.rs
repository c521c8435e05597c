//! # Seed Data Generator
//!
//! Populates the database with sample clients and quotations for development.
//!
//! ## Usage
//! ```bash
//! # 12 quotations (default)
//! cargo run -p prequote-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p prequote-db --bin seed -- --count 40 --db ./data/prequote.db
//! ```
//!
//! Each quotation gets a handful of materials, one MOQ-flagged component
//! with its amortized development filled in, and sometimes a manual
//! development line.

use std::env;

use chrono::{Duration, Utc};
use prequote_core::{
    ClientDetails, ClientInput, Component, Development, Language, LineItems, QuotationInput,
};
use prequote_db::{Database, DbConfig};
use rust_decimal::Decimal;

/// (name, brand, email)
const CLIENTS: &[(&str, &str, &str)] = &[
    ("Atlântico Moda", "Maré", "compras@atlanticomoda.pt"),
    ("Nordic Kids AB", "Lilla Björn", "buying@nordickids.se"),
    ("Maison Lin", "Lin & Co", "achats@maisonlin.fr"),
    ("Textiles Sierra", "Sierra", "compras@textilessierra.es"),
    ("Urban Thread Ltd", "UT", "sourcing@urbanthread.co.uk"),
];

/// (description, supplier, unit price in cents, consumption in thousandths)
const MATERIALS: &[(&str, &str, i64, i64)] = &[
    ("Cotton jersey 180g", "Tecidos do Ave", 450, 1_200),
    ("Organic twill", "Riopele", 690, 1_500),
    ("Polyester lining", "Lemos Têxteis", 180, 800),
    ("Metal zipper 18cm", "YKK", 38, 1_000),
    ("Woven label", "Etiquetas Norte", 6, 1_000),
    ("Care label", "Etiquetas Norte", 3, 1_000),
    ("Horn button 20L", "Botões Lda", 22, 6_000),
    ("Sewing thread", "Coats", 1, 150_000),
];

const MOQ_CANDIDATES: &[(&str, &str, i64, u32)] = &[
    ("Custom dyed ribbing", "Malhas Vale", 320, 500),
    ("Printed hangtag", "Gráfica Minho", 12, 2_000),
    ("Embossed leather patch", "Couros Braga", 85, 1_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 12;
    let mut db_path = String::from("./prequote_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(12);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Prequote Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of quotations to generate (default: 12)");
                println!("  -d, --db <PATH>    Database file path (default: ./prequote_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Prequote Seed Data Generator");
    println!("============================");
    println!("Database:   {}", db_path);
    println!("Quotations: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = db.migration_status().await?;
    println!("✓ Connected to database ({applied}/{total} migrations applied)");

    let existing = db.quotations().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} quotations", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut clients = Vec::new();
    for (name, brand, email) in CLIENTS {
        let client = db
            .clients()
            .create(&ClientInput {
                name: name.to_string(),
                brand: Some(brand.to_string()),
                email: Some(email.to_string()),
                sample_size: Some("M".to_string()),
                ..ClientInput::default()
            })
            .await?;
        clients.push(client);
    }
    println!("✓ Created {} clients", clients.len());

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();

    for n in 0..count {
        let client = &clients[n % clients.len()];
        let input = QuotationInput {
            client_id: Some(client.id.clone()),
            client: ClientDetails::from(client),
            date: Some(today - Duration::days((count - n) as i64)),
            items: sample_items(n)?,
            language: Language::ALL[n % Language::ALL.len()],
            ..QuotationInput::default()
        };

        match db.quotations().create(&input, today).await {
            Ok(q) => println!("  {} {} ({})", q.code, q.client.name, q.language),
            Err(e) => eprintln!("Failed to insert quotation {}: {}", n, e),
        }
    }

    println!();
    println!("✓ Generated {} quotations in {:?}", count, start.elapsed());

    db.close().await;
    Ok(())
}

/// Line items for the `n`-th sample quotation.
fn sample_items(n: usize) -> Result<LineItems, prequote_core::CoreError> {
    let mut items = LineItems::new();

    for k in 0..4 {
        let (description, supplier, cents, thousandths) = MATERIALS[(n + k * 3) % MATERIALS.len()];
        items.add_component(Component::new(
            description,
            supplier,
            Decimal::new(cents, 2),
            Decimal::new(thousandths, 3),
        ));
    }

    let (description, supplier, cents, moq_quantity) = MOQ_CANDIDATES[n % MOQ_CANDIDATES.len()];
    let mut moq = Component::new(description, supplier, Decimal::new(cents, 2), Decimal::ONE);
    moq.has_moq = true;
    let moq_id = items.add_component(moq);

    if let Some(pair) = items.moq_pair(&moq_id).cloned() {
        items.update_development(Development {
            cost: Decimal::new(cents, 2),
            moq_quantity,
            include_in_subtotal: n % 2 == 0,
            ..pair
        })?;
    }

    if n % 3 == 0 {
        items.add_development(Development::new("Pattern development", Decimal::from(120)));
    }

    Ok(items)
}
