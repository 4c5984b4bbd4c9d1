mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Value, json};
use shoppingcart_api::{
    dto::products::ProductInput,
    error::AppResult,
    models::Product,
    routes::create_app,
    state::AppState,
    store::{BrowseCriteria, EntityStore, MemoryStore, Page},
    validation::PresenceVerifier,
};

/// Memory-backed product store whose deletes never take effect.
struct StuckStore {
    inner: MemoryStore,
}

#[async_trait]
impl EntityStore<Product, ProductInput> for StuckStore {
    async fn browse(&self, criteria: &BrowseCriteria) -> AppResult<Page<Product>> {
        EntityStore::<Product, ProductInput>::browse(&self.inner, criteria).await
    }

    async fn create(&self, input: ProductInput) -> AppResult<Product> {
        EntityStore::<Product, ProductInput>::create(&self.inner, input).await
    }

    async fn find(&self, id: i64) -> AppResult<Option<Product>> {
        EntityStore::<Product, ProductInput>::find(&self.inner, id).await
    }

    async fn find_by_id_or_alias(&self, key: &str) -> AppResult<Option<Product>> {
        EntityStore::<Product, ProductInput>::find_by_id_or_alias(&self.inner, key).await
    }

    async fn update(&self, product: Product, input: ProductInput) -> AppResult<Product> {
        EntityStore::<Product, ProductInput>::update(&self.inner, product, input).await
    }

    async fn delete(&self, _product: &Product) -> AppResult<bool> {
        Ok(false)
    }

    fn presence(&self) -> &dyn PresenceVerifier {
        &self.inner
    }
}

#[tokio::test]
async fn failed_delete_is_500_with_null_body() {
    let app = create_app(AppState::new(
        Arc::new(StuckStore {
            inner: MemoryStore::new(),
        }),
        Arc::new(MemoryStore::new()),
    ));

    let (status, body) = common::post(&app, "/api/products", json!({ "title": "Anchor" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body.unwrap()["product"]["id"].as_i64().unwrap();

    let (status, body) = common::delete(&app, &format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, Some(Value::Null));

    let (status, _) = common::get(&app, &format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}
