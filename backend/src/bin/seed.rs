//! Seed binary: loads the initial categories, accounts, and products.
//!
//! Safe to re-run: categories and products are inserted only when missing,
//! accounts are upserted (their passwords re-hashed from the environment).
//!
//! Required environment: DATABASE_URL plus POS_SEED_ADMIN_PASSWORD,
//! POS_SEED_CASHIER1_PASSWORD, POS_SEED_CASHIER2_PASSWORD.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use shared::validation::{validate_login, validate_password};

const CATEGORIES: [&str; 6] = [
    "Household",
    "Paint",
    "Electrical",
    "Plumbing",
    "Finishing",
    "Construction",
];

/// (full name, login, role, password env var)
const USERS: [(&str, &str, &str, &str); 3] = [
    ("Admin", "admin", "admin", "POS_SEED_ADMIN_PASSWORD"),
    ("First Cashier", "cashier_1", "cashier", "POS_SEED_CASHIER1_PASSWORD"),
    ("Second Cashier", "cashier_2", "cashier", "POS_SEED_CASHIER2_PASSWORD"),
];

/// (name, category, unit) — prices and stock are entered later
const PRODUCTS: [(&str, &str, &str); 10] = [
    ("Paint (1l)", "Paint", "litre"),
    ("Cement (50kg)", "Construction", "bag"),
    ("Putty knife", "Finishing", "piece"),
    ("Nails", "Household", "kg"),
    ("Gypsum (25kg)", "Construction", "bag"),
    ("Screws", "Household", "kg"),
    ("Light bulb", "Electrical", "piece"),
    ("Cable", "Electrical", "metre"),
    ("Pipe wrench", "Plumbing", "piece"),
    ("Shovel", "Household", "piece"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_categories(&pool).await?;
    seed_users(&pool).await?;
    seed_products(&pool).await?;

    tracing::info!("Seed done");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    for name in CATEGORIES {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(pool)
            .await?;
    }
    tracing::info!("Categories seeded");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    for (full_name, login, role, password_var) in USERS {
        validate_login(login).map_err(anyhow::Error::msg)?;

        let password = std::env::var(password_var)
            .with_context(|| format!("{password_var} must be set"))?;
        validate_password(&password).map_err(anyhow::Error::msg)?;

        let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;

        sqlx::query(
            r#"
            INSERT INTO users (full_name, login, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (login) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                is_active = TRUE
            "#,
        )
        .bind(full_name)
        .bind(login)
        .bind(&hash)
        .bind(role)
        .execute(pool)
        .await?;

        tracing::info!(login, role, "account seeded");
    }
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<()> {
    for (name, category, unit) in PRODUCTS {
        sqlx::query(
            r#"
            INSERT INTO products (name, category_id, unit)
            SELECT $1, c.id, $2
            FROM categories c
            WHERE c.name = $3
              AND NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(category)
        .execute(pool)
        .await?;
    }
    tracing::info!("Products seeded");
    Ok(())
}
