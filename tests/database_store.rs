use std::sync::Arc;

use serde_json::json;
use shoppingcart_api::{
    db::{create_orm_conn, run_migrations},
    dto::{categories::CategoryInput, products::ProductInput},
    store::{BrowseCriteria, CATEGORIES_TABLE, CategoryStore, DatabaseStore, PRODUCTS_TABLE, ProductStore},
};

// Postgres-backed store round: create, look up, count, update, delete.
#[tokio::test]
async fn database_store_crud_and_presence() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database store tests.");
            return Ok(());
        }
    };

    let conn = create_orm_conn(&database_url).await?;
    run_migrations(&conn).await?;
    let store = Arc::new(DatabaseStore::new(conn));
    let products: Arc<ProductStore> = store.clone();
    let categories: Arc<CategoryStore> = store;

    // Keeps reruns clear of the unique alias index.
    let suffix = chrono::Utc::now().timestamp_micros();
    let alias = format!("db-mug-{suffix}");

    let created = products
        .create(ProductInput {
            title: Some("DB Mug".into()),
            alias: Some(Some(alias.clone())),
            price: Some(Some(9.5)),
            galleries: Some(Some(json!(["a.jpg"]))),
            ..Default::default()
        })
        .await?;
    assert_eq!(created.price, Some(9.5));

    let by_alias = products.find_by_id_or_alias(&alias).await?.expect("by alias");
    assert_eq!(by_alias.id, created.id);

    let presence = products.presence();
    assert_eq!(presence.count(PRODUCTS_TABLE, "alias", &alias, None).await?, 1);
    let own_id = created.id.to_string();
    assert_eq!(
        presence
            .count(PRODUCTS_TABLE, "alias", &alias, Some(("id", own_id.as_str())))
            .await?,
        0
    );

    let updated = products
        .update(
            created.clone(),
            ProductInput {
                description: Some(Some("Stoneware".into())),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.title, "DB Mug");
    assert_eq!(updated.description.as_deref(), Some("Stoneware"));

    let page = products
        .browse(&BrowseCriteria {
            limit: 1,
            ..Default::default()
        })
        .await?;
    assert_eq!(page.items.len(), 1);
    assert!(page.next_cursor.is_some());

    assert!(products.delete(&updated).await?);
    assert!(products.find(created.id).await?.is_none());

    let parent = categories
        .create(CategoryInput {
            name: Some("DB Parent".into()),
            alias: Some(Some(format!("db-parent-{suffix}"))),
            status: Some(1),
            ..Default::default()
        })
        .await?;
    let parent_id = parent.id.to_string();
    assert_eq!(
        categories
            .presence()
            .count(CATEGORIES_TABLE, "id", &parent_id, None)
            .await?,
        1
    );

    let child = categories
        .create(CategoryInput {
            name: Some("DB Child".into()),
            parent_id: Some(Some(parent.id)),
            ..Default::default()
        })
        .await?;
    assert_eq!(child.parent_id, Some(parent.id));

    assert!(categories.delete(&child).await?);
    assert!(categories.delete(&parent).await?);
    Ok(())
}
