//! # Seed Data Generator
//!
//! Populates a development database with reference data.
//!
//! ## Usage
//! ```bash
//! cargo run -p digicheese-db --bin seed
//!
//! # Specify database path
//! cargo run -p digicheese-db --bin seed -- --db ./data/digicheese.db
//! ```
//!
//! ## Generated Data
//! - Départements and a few communes in each (Jura, Doubs, Corsica, Réunion, ...)
//! - Product categories and a cheese counter's worth of products
//! - Weight-banded shipping rates
//! - Staff roles
//!
//! Every payload goes through `Normalize` first, exactly like an HTTP
//! request would.

use anyhow::Context;
use digicheese_core::{
    CommuneCreate, DepartementCreate, Normalize, ProductCategoryCreate, ProductCreate, RoleCreate,
    ShippingRateCreate,
};
use digicheese_db::{Database, DbConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "./digicheese.db";

/// (code, name, [(commune, postal code)])
const GEOGRAPHY: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "39",
        "Jura",
        &[
            ("lons-le-saunier", "39000"),
            ("dole", "39100"),
            ("saint-claude", "39200"),
            ("poligny", "39800"),
            ("arbois", "39600"),
        ],
    ),
    (
        "25",
        "Doubs",
        &[
            ("besançon", "25000"),
            ("pontarlier", "25300"),
            ("montbéliard", "25200"),
        ],
    ),
    (
        "74",
        "Haute-Savoie",
        &[("annecy", "74000"), ("thônes", "74230")],
    ),
    ("73", "Savoie", &[("chambéry", "73000"), ("beaufort", "73270")]),
    ("2A", "Corse-du-Sud", &[("ajaccio", "20000")]),
    ("2B", "Haute-Corse", &[("bastia", "20200")]),
    ("974", "La Réunion", &[("saint-denis", "97400")]),
];

/// (name, description)
const CATEGORIES: &[(&str, &str)] = &[
    ("Pâtes pressées cuites", "Comté, Beaufort, Gruyère"),
    ("Pâtes pressées non cuites", "Morbier, Reblochon, Tomme"),
    ("Pâtes molles", "Mont d'Or, Brie, Camembert"),
    ("Pâtes persillées", "Bleu de Gex, Roquefort"),
    ("Chèvres", "Fromages de chèvre"),
];

/// (category index, name, unit price cents, weight grams, stock)
const PRODUCTS: &[(usize, &str, i64, i64, i64)] = &[
    (0, "Comté 12 mois", 1990, 500, 40),
    (0, "Comté 18 mois", 2490, 500, 25),
    (0, "Comté 24 mois", 2990, 500, 12),
    (0, "Beaufort d'été", 3190, 500, 8),
    (1, "Morbier", 1890, 400, 18),
    (1, "Reblochon fermier", 1250, 450, 20),
    (1, "Tomme de Savoie", 1690, 500, 4),
    (2, "Mont d'Or", 1590, 450, 3),
    (2, "Brie de Meaux", 2290, 500, 10),
    (3, "Bleu de Gex", 2100, 250, 6),
    (4, "Crottin de Chavignol", 390, 60, 50),
];

/// (min grams, max grams, cost cents, description)
const SHIPPING_RATES: &[(i64, Option<i64>, i64, &str)] = &[
    (0, Some(500), 490, "Colis léger"),
    (501, Some(2000), 790, "Colis standard"),
    (2001, Some(5000), 1190, "Colis lourd"),
    (5001, None, 1890, "Colis très lourd"),
];

/// (name, description)
const ROLES: &[(&str, &str)] = &[
    ("admin", "Gestion complète de l'application"),
    ("vendeur", "Comptoir et commandes clients"),
    ("preparateur", "Préparation et expédition des colis"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from(DEFAULT_DB_PATH);

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
                println!("Digicheese Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: {DEFAULT_DB_PATH})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening database at {db_path}"))?;

    let existing = db.departements().count().await?;
    if existing > 0 {
        warn!(
            departements = existing,
            "Database already seeded, delete the file to regenerate"
        );
        return Ok(());
    }

    seed_geography(&db).await?;
    seed_catalog(&db).await?;
    seed_shipping(&db).await?;
    seed_roles(&db).await?;

    info!(
        path = %db_path,
        communes = db.communes().count().await?,
        products = db.products().count().await?,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

async fn seed_geography(db: &Database) -> anyhow::Result<()> {
    for (code, name, communes) in GEOGRAPHY {
        let departement = DepartementCreate {
            department_code: code.to_string(),
            department_name: name.to_string(),
        }
        .normalize()
        .with_context(|| format!("département {code}"))?;
        let departement = db.departements().create(&departement).await?;

        for (city, postal_code) in communes.iter() {
            let commune = CommuneCreate {
                city_name: city.to_string(),
                postal_code: postal_code.to_string(),
                departement_id: Some(departement.id),
            }
            .normalize()
            .with_context(|| format!("commune {city}"))?;
            db.communes().create(&commune).await?;
        }
    }

    info!(departements = GEOGRAPHY.len(), "Seeded geography");
    Ok(())
}

async fn seed_catalog(db: &Database) -> anyhow::Result<()> {
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = ProductCategoryCreate {
            name: name.to_string(),
            description: Some(description.to_string()),
        }
        .normalize()?;
        category_ids.push(db.product_categories().create(&category).await?.id);
    }

    for &(category, name, price, weight, stock) in PRODUCTS {
        let mut product = ProductCreate::new(name, price, weight);
        product.category_id = category_ids.get(category).copied();
        product.stock_quantity = stock;
        let product = product.normalize().with_context(|| format!("product {name}"))?;
        db.products().create(&product).await?;
    }

    info!(
        categories = CATEGORIES.len(),
        products = PRODUCTS.len(),
        "Seeded catalog"
    );
    Ok(())
}

async fn seed_shipping(db: &Database) -> anyhow::Result<()> {
    for &(min, max, cost, description) in SHIPPING_RATES {
        let rate = ShippingRateCreate {
            weight_min_grams: min,
            weight_max_grams: max,
            cost_cents: cost,
            description: Some(description.to_string()),
        }
        .normalize()?;
        db.shipping_rates().create(&rate).await?;
    }

    info!(bands = SHIPPING_RATES.len(), "Seeded shipping rates");
    Ok(())
}

async fn seed_roles(db: &Database) -> anyhow::Result<()> {
    for (name, description) in ROLES {
        let role = RoleCreate {
            name: name.to_string(),
            description: Some(description.to_string()),
        }
        .normalize()?;
        db.roles().create(&role).await?;
    }

    info!(roles = ROLES.len(), "Seeded roles");
    Ok(())
}
