//! Seed the database with demo catalog and order data.
//!
//! Inserts a small bottled-water catalog plus a spread of orders over the
//! last two weeks: completed orders with invoices, one completed order
//! without an invoice, an in-delivery and a suspended order, and one legacy
//! row whose items are stored as a JSON-encoded string. The mix exercises
//! every path the report engine has to handle.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sqlx::PgPool;

use super::{CommandError, connect};

struct SeedProduct {
    name: &'static str,
    category: &'static str,
    price: i64,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Refill Gallon 19L",
        category: "gallon",
        price: 6000,
    },
    SeedProduct {
        name: "Gallon 19L + Container",
        category: "gallon",
        price: 55_000,
    },
    SeedProduct {
        name: "Bottle 600ml (24x)",
        category: "bottle",
        price: 38_000,
    },
    SeedProduct {
        name: "Cup 240ml (48x)",
        category: "cup",
        price: 24_000,
    },
];

/// Seed demo data, optionally clearing existing rows first.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing or any statement fails.
pub async fn run(clear: bool) -> Result<(), CommandError> {
    let pool = connect().await?;

    if clear {
        tracing::info!("Clearing existing data...");
        sqlx::query("TRUNCATE invoices, orders, products RESTART IDENTITY")
            .execute(&pool)
            .await?;
    }

    tracing::info!("Seeding products...");
    let mut product_ids = Vec::with_capacity(CATALOG.len());
    for product in CATALOG {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO products (name, category, price) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(product.name)
        .bind(product.category)
        .bind(product.price)
        .fetch_one(&pool)
        .await?;
        product_ids.push(id);
    }

    let now = Utc::now();
    let refill = product_ids[0];
    let gallon = product_ids[1];
    let bottle = product_ids[2];
    let cup = product_ids[3];

    tracing::info!("Seeding orders...");

    // Completed orders with invoices across the last two weeks.
    let order_id = insert_order(
        &pool,
        "Ibu Sari",
        "completed",
        &json!([{"productId": refill, "quantity": 3, "price": 6000}]).to_string(),
        now - Duration::days(1),
    )
    .await?;
    insert_invoice(&pool, order_id, 18_000).await?;

    let order_id = insert_order(
        &pool,
        "Warung Pak Budi",
        "completed",
        &json!([
            {"productId": bottle, "quantity": 2, "price": 38_000},
            {"productId": cup, "quantity": 1, "price": 24_000}
        ])
        .to_string(),
        now - Duration::days(3),
    )
    .await?;
    // Invoice below the line-item sum: a manual discount was applied.
    insert_invoice(&pool, order_id, 95_000).await?;

    let order_id = insert_order(
        &pool,
        "Kantor Graha Tirta",
        "completed",
        &json!([{"productId": gallon, "quantity": 2, "price": 55_000}]).to_string(),
        now - Duration::days(6),
    )
    .await?;
    insert_invoice(&pool, order_id, 110_000).await?;

    // Completed order that never got an invoice; revenue falls back to the
    // line-item sum.
    insert_order(
        &pool,
        "Ibu Ratna",
        "completed",
        &json!([{"productId": refill, "quantity": 5, "price": 6000}]).to_string(),
        now - Duration::days(8),
    )
    .await?;

    // Legacy row: items stored as a JSON-encoded string, entries keyed by
    // `id` instead of `productId`, numbers as strings.
    let legacy_items =
        json!([{"id": refill, "quantity": "2", "price": "6000"}]).to_string();
    let order_id = insert_order(
        &pool,
        "Toko Berkah (legacy import)",
        "completed",
        &json!(legacy_items).to_string(),
        now - Duration::days(10),
    )
    .await?;
    insert_invoice(&pool, order_id, 12_000).await?;

    // Orders that must not count toward reports.
    insert_order(
        &pool,
        "Pak Dedi",
        "in-delivery",
        &json!([{"productId": refill, "quantity": 1, "price": 6000}]).to_string(),
        now - Duration::hours(3),
    )
    .await?;
    insert_order(
        &pool,
        "Bu Lilis",
        "suspended",
        &json!([{"productId": cup, "quantity": 2, "price": 24_000}]).to_string(),
        now - Duration::days(2),
    )
    .await?;

    tracing::info!("Seeding complete!");
    tracing::info!("  Products: {}", CATALOG.len());
    tracing::info!("  Orders: 7 (5 completed, 1 in-delivery, 1 suspended)");
    tracing::info!("  Invoices: 4");
    Ok(())
}

async fn insert_order(
    pool: &PgPool,
    customer: &str,
    status: &str,
    items: &str,
    created_at: DateTime<Utc>,
) -> Result<i64, CommandError> {
    let (id,): (i64,) = sqlx::query_as(
        r"
        INSERT INTO orders (customer_name, status, items, created_at)
        VALUES ($1, $2, $3::jsonb, $4)
        RETURNING id
        ",
    )
    .bind(customer)
    .bind(status)
    .bind(items)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn insert_invoice(pool: &PgPool, order_id: i64, total: i64) -> Result<(), CommandError> {
    sqlx::query("INSERT INTO invoices (order_id, total) VALUES ($1, $2)")
        .bind(order_id)
        .bind(total)
        .execute(pool)
        .await?;
    Ok(())
}
