use anyhow::Context;
use shoppingcart_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to seed the database")?;

    // Ensure migrations are applied.
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(database_url).await?;
    let root_id = ensure_category(&pool, "Apparel", "apparel", None).await?;
    let child_id = ensure_category(&pool, "Hoodies", "hoodies", Some(root_id)).await?;
    ensure_category(&pool, "Accessories", "accessories", None).await?;
    seed_products(&pool).await?;

    println!("Seed completed. Root category ID: {root_id}, child category ID: {child_id}");
    Ok(())
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    name: &str,
    alias: &str,
    parent_id: Option<i64>,
) -> anyhow::Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO shop_categories (name, alias, parent_id, status)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (alias) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(alias)
    .bind(parent_id)
    .fetch_optional(pool)
    .await?;

    // If the category already exists, fetch its id
    let category_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (i64,) = sqlx::query_as("SELECT id FROM shop_categories WHERE alias = $1")
                .bind(alias)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured category {alias}");
    Ok(category_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Axum Hoodie", "axum-hoodie", "Warm hoodie for Rustaceans", 55.0, r#"["hoodie-front.jpg","hoodie-back.jpg"]"#),
        ("Ferris Mug", "ferris-mug", "Coffee tastes better with Ferris", 12.0, r#"["mug.jpg"]"#),
        ("Rust Sticker Pack", "rust-sticker-pack", "Decorate your laptop", 5.0, "[]"),
    ];

    for (title, alias, description, price, galleries) in products {
        let galleries: serde_json::Value =
            serde_json::from_str(galleries).context("seed galleries must be valid JSON")?;
        sqlx::query(
            r#"
            INSERT INTO shop_products (title, alias, description, price, galleries)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (alias) DO NOTHING
            "#,
        )
        .bind(title)
        .bind(alias)
        .bind(description)
        .bind(price)
        .bind(galleries)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
