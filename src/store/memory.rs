use std::{cmp::Ordering, collections::BTreeMap};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    dto::{categories::CategoryInput, products::ProductInput},
    error::{AppError, AppResult},
    models::{Category, Product},
    routes::params::SortOrder,
    store::{
        BrowseCriteria, CATEGORIES_TABLE, CATEGORY_COLUMNS, EntityStore, PRODUCT_COLUMNS,
        PRODUCTS_TABLE, Page, sort_column,
    },
    validation::{PresenceVerifier, value::as_text},
};

trait Row: Clone + Serialize {
    fn id(&self) -> i64;
    fn alias(&self) -> Option<&str>;
}

impl Row for Product {
    fn id(&self) -> i64 {
        self.id
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl Row for Category {
    fn id(&self) -> i64 {
        self.id
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Row> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn by_id_or_alias(&self, key: &str) -> Option<T> {
        if let Ok(id) = key.parse::<i64>() {
            if let Some(row) = self.rows.get(&id) {
                return Some(row.clone());
            }
        }
        self.rows.values().find(|row| row.alias() == Some(key)).cloned()
    }

    fn browse(&self, criteria: &BrowseCriteria, columns: &[&str]) -> AppResult<Page<T>> {
        let mut matched = Vec::new();
        for row in self.rows.values() {
            let attributes = attributes(row)?;
            let keep = criteria.filters.iter().all(|(key, expected)| {
                if !is_filterable(key, columns) {
                    return true;
                }
                attributes.get(key).and_then(as_text).as_deref() == Some(expected.as_str())
            });
            if keep {
                matched.push((attributes, row));
            }
        }
        let total = matched.len() as u64;

        let sort = sort_column(&criteria.sort, columns);
        matched.sort_by(|(a, left), (b, right)| {
            let ordering = compare_values(a.get(sort), b.get(sort)).then(left.id().cmp(&right.id()));
            match criteria.direction {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let items: Vec<T> = matched
            .into_iter()
            .map(|(_, row)| row)
            .filter(|row| match (criteria.cursor, &criteria.direction) {
                (None, _) => true,
                (Some(cursor), SortOrder::Desc) => row.id() < cursor,
                (Some(cursor), SortOrder::Asc) => row.id() > cursor,
            })
            .skip(criteria.offset as usize)
            .take(criteria.limit as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total, criteria.limit, |row: &T| row.id()))
    }

    fn count(&self, column: &str, value: &str, excluding: Option<(&str, &str)>) -> AppResult<u64> {
        let mut count = 0;
        for row in self.rows.values() {
            let attributes = attributes(row)?;
            let read = |name: &str| attributes.get(name).and_then(as_text);
            if read(column).as_deref() != Some(value) {
                continue;
            }
            if let Some((except_column, except_value)) = excluding {
                if read(except_column).as_deref() == Some(except_value) {
                    continue;
                }
            }
            count += 1;
        }
        Ok(count)
    }
}

fn attributes<T: Serialize>(row: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(row).map_err(anyhow::Error::from)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Internal(anyhow::anyhow!("row did not serialize to an object"))),
    }
}

fn is_filterable(key: &str, columns: &[&str]) -> bool {
    columns.contains(&key) && !key.ends_with("_at")
}

/// Null sorts first; numbers by value; anything else by its text.
fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let left = left.filter(|v| !v.is_null());
    let right = right.filter(|v| !v.is_null());
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(a), Some(b)) => as_text(a).cmp(&as_text(b)),
    }
}

/// Tables kept in process memory. Used by tests and when a family is
/// configured with the `memory` backend.
#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<Table<Product>>,
    categories: RwLock<Table<Category>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_product(product: &mut Product, input: ProductInput) {
    if let Some(title) = input.title {
        product.title = title;
    }
    if let Some(alias) = input.alias {
        product.alias = alias;
    }
    if let Some(image) = input.image {
        product.image = image;
    }
    if let Some(description) = input.description {
        product.description = description;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(galleries) = input.galleries {
        product.galleries = galleries;
    }
}

fn apply_category(category: &mut Category, input: CategoryInput) {
    if let Some(name) = input.name {
        category.name = name;
    }
    if let Some(alias) = input.alias {
        category.alias = alias;
    }
    if let Some(image) = input.image {
        category.image = image;
    }
    if let Some(description) = input.description {
        category.description = description;
    }
    if let Some(parent_id) = input.parent_id {
        category.parent_id = parent_id;
    }
    if let Some(order) = input.order {
        category.order = order;
    }
    if let Some(status) = input.status {
        category.status = status;
    }
}

#[async_trait]
impl EntityStore<Product, ProductInput> for MemoryStore {
    async fn browse(&self, criteria: &BrowseCriteria) -> AppResult<Page<Product>> {
        self.products.read().await.browse(criteria, PRODUCT_COLUMNS)
    }

    async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let mut table = self.products.write().await;
        let now = Utc::now();
        let mut product = Product {
            id: table.next_id(),
            title: String::new(),
            alias: None,
            image: None,
            description: None,
            price: None,
            galleries: None,
            created_at: now,
            updated_at: now,
        };
        apply_product(&mut product, input);
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.rows.get(&id).cloned())
    }

    async fn find_by_id_or_alias(&self, key: &str) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.by_id_or_alias(key))
    }

    async fn update(&self, mut product: Product, input: ProductInput) -> AppResult<Product> {
        let mut table = self.products.write().await;
        if !table.rows.contains_key(&product.id) {
            return Err(AppError::NotFound);
        }
        apply_product(&mut product, input);
        product.updated_at = Utc::now();
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, product: &Product) -> AppResult<bool> {
        Ok(self.products.write().await.rows.remove(&product.id).is_some())
    }

    fn presence(&self) -> &dyn PresenceVerifier {
        self
    }
}

#[async_trait]
impl EntityStore<Category, CategoryInput> for MemoryStore {
    async fn browse(&self, criteria: &BrowseCriteria) -> AppResult<Page<Category>> {
        self.categories.read().await.browse(criteria, CATEGORY_COLUMNS)
    }

    async fn create(&self, input: CategoryInput) -> AppResult<Category> {
        let mut table = self.categories.write().await;
        let now = Utc::now();
        let mut category = Category {
            id: table.next_id(),
            name: String::new(),
            alias: None,
            image: None,
            description: None,
            parent_id: None,
            order: 0,
            status: 0,
            created_at: now,
            updated_at: now,
        };
        apply_category(&mut category, input);
        table.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find(&self, id: i64) -> AppResult<Option<Category>> {
        Ok(self.categories.read().await.rows.get(&id).cloned())
    }

    async fn find_by_id_or_alias(&self, key: &str) -> AppResult<Option<Category>> {
        Ok(self.categories.read().await.by_id_or_alias(key))
    }

    async fn update(&self, mut category: Category, input: CategoryInput) -> AppResult<Category> {
        let mut table = self.categories.write().await;
        if !table.rows.contains_key(&category.id) {
            return Err(AppError::NotFound);
        }
        apply_category(&mut category, input);
        category.updated_at = Utc::now();
        table.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, category: &Category) -> AppResult<bool> {
        Ok(self.categories.write().await.rows.remove(&category.id).is_some())
    }

    fn presence(&self) -> &dyn PresenceVerifier {
        self
    }
}

#[async_trait]
impl PresenceVerifier for MemoryStore {
    async fn count(
        &self,
        table: &str,
        column: &str,
        value: &str,
        excluding: Option<(&str, &str)>,
    ) -> AppResult<u64> {
        match table {
            PRODUCTS_TABLE => self.products.read().await.count(column, value, excluding),
            CATEGORIES_TABLE => self.categories.read().await.count(column, value, excluding),
            other => Err(AppError::Internal(anyhow::anyhow!("unknown table `{other}`"))),
        }
    }
}
