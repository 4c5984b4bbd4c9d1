use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, StoreKind},
    services::product_service,
    store::{CategoryStore, DatabaseStore, MemoryStore, ProductStore},
    validation::{PresenceVerifier, RuleRegistry, Validator},
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductStore>,
    pub categories: Arc<CategoryStore>,
    pub rules: Arc<RuleRegistry>,
}

impl AppState {
    pub fn new(products: Arc<ProductStore>, categories: Arc<CategoryStore>) -> Self {
        Self {
            products,
            categories,
            rules: Arc::new(default_rules()),
        }
    }

    /// Both families backed by one in-process store.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store)
    }

    /// Picks each family's backend from configuration. `conn` is the shared
    /// database connection, required when at least one family uses it.
    pub fn from_config(config: &AppConfig, conn: Option<DatabaseConnection>) -> anyhow::Result<Self> {
        let database = match (conn, config.uses_database()) {
            (Some(conn), true) => Some(Arc::new(DatabaseStore::new(conn))),
            (None, true) => anyhow::bail!("a database connection is required by the configured stores"),
            _ => None,
        };
        let memory = Arc::new(MemoryStore::new());

        let products: Arc<ProductStore> = match (config.product_store, &database) {
            (StoreKind::Database, Some(db)) => db.clone(),
            _ => memory.clone(),
        };
        let categories: Arc<CategoryStore> = match (config.category_store, &database) {
            (StoreKind::Database, Some(db)) => db.clone(),
            _ => memory,
        };

        tracing::info!(
            products = ?config.product_store,
            categories = ?config.category_store,
            "entity stores selected"
        );
        Ok(Self::new(products, categories))
    }

    pub fn validator<'a>(&'a self, presence: &'a dyn PresenceVerifier) -> Validator<'a> {
        Validator::new(&self.rules, presence)
    }
}

/// Custom rules are registered once here and never change afterwards.
pub fn default_rules() -> RuleRegistry {
    let mut rules = RuleRegistry::new();
    product_service::register_rules(&mut rules);
    rules
}
