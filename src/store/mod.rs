//! Entity access for the two resource families.
//!
//! Services only see [`EntityStore`] trait objects, so the backend behind
//! each family is chosen once at startup (see [`crate::config::StoreKind`]).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    dto::{categories::CategoryInput, products::ProductInput},
    error::AppResult,
    models::{Category, Product},
    routes::params::SortOrder,
    validation::PresenceVerifier,
};

pub mod database;
pub mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

pub const PRODUCTS_TABLE: &str = "shop_products";
pub const CATEGORIES_TABLE: &str = "shop_categories";

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseCriteria {
    /// Column to order by. Columns the store does not know fall back to `id`.
    pub sort: String,
    pub direction: SortOrder,
    pub limit: u64,
    pub offset: u64,
    /// Id of the last row already seen.
    pub cursor: Option<i64>,
    /// Equality filters; keys that are not filterable columns are ignored.
    pub filters: HashMap<String, String>,
}

impl Default for BrowseCriteria {
    fn default() -> Self {
        Self {
            sort: "id".to_string(),
            direction: SortOrder::Desc,
            limit: 25,
            offset: 0,
            cursor: None,
            filters: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows matching the filters, ignoring cursor and paging.
    pub total: u64,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Builds a page, handing out a cursor only when the page came back full.
    pub fn new(items: Vec<T>, total: u64, limit: u64, id_of: impl Fn(&T) -> i64) -> Self {
        let next_cursor = match items.last() {
            Some(last) if limit > 0 && items.len() as u64 == limit => Some(encode_cursor(id_of(last))),
            _ => None,
        };
        Self {
            items,
            total,
            next_cursor,
        }
    }
}

pub fn encode_cursor(id: i64) -> String {
    id.to_string()
}

/// Unreadable cursors are treated as absent.
pub fn decode_cursor(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[async_trait]
pub trait EntityStore<E, I>: Send + Sync
where
    E: Send + Sync + 'static,
    I: Send + 'static,
{
    async fn browse(&self, criteria: &BrowseCriteria) -> AppResult<Page<E>>;

    async fn create(&self, input: I) -> AppResult<E>;

    async fn find(&self, id: i64) -> AppResult<Option<E>>;

    /// Numeric keys match an id first and then an alias.
    async fn find_by_id_or_alias(&self, key: &str) -> AppResult<Option<E>>;

    /// Applies the submitted attributes to `entity` and returns the stored result.
    async fn update(&self, entity: E, input: I) -> AppResult<E>;

    /// `false` when the store could not remove the row.
    async fn delete(&self, entity: &E) -> AppResult<bool>;

    fn presence(&self) -> &dyn PresenceVerifier;
}

pub type ProductStore = dyn EntityStore<Product, ProductInput>;
pub type CategoryStore = dyn EntityStore<Category, CategoryInput>;

pub(crate) const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "title",
    "alias",
    "image",
    "description",
    "price",
    "created_at",
    "updated_at",
];

pub(crate) const CATEGORY_COLUMNS: &[&str] = &[
    "id",
    "name",
    "alias",
    "image",
    "description",
    "parent_id",
    "order",
    "status",
    "created_at",
    "updated_at",
];

/// Resolves the requested sort column against `known`.
pub(crate) fn sort_column<'a>(requested: &'a str, known: &[&str]) -> &'a str {
    if known.contains(&requested) { requested } else { "id" }
}
