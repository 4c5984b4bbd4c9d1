use serde_json::{Map, Value};

use crate::{
    dto::categories::{CategoryBrowse, CategoryInput, CategoryRead},
    error::{AppError, AppResult},
    models::Category,
    response::Meta,
    routes::params::CategoryBrowseQuery,
    services::product_service::ALIAS_PATTERN,
    state::AppState,
    store::CATEGORIES_TABLE,
    validation::{RuleSet, value::is_zero_or_null},
};

/// `order` and `status` are stored as 32-bit integers.
const INTEGER_COLUMN: &str = "numeric|between:-2147483648,2147483647";

/// `parent_id` is only checked against existing rows when it names a parent.
fn parent_rules(parent_id: Option<&Value>, own_id: Option<i64>) -> String {
    let mut rules = String::from("numeric");
    if let Some(id) = own_id {
        rules.push_str(&format!("|not_in:{id}"));
    }
    if !is_zero_or_null(parent_id) {
        rules.push_str(&format!("|exists:{CATEGORIES_TABLE},id"));
    }
    rules
}

fn store_rules(payload: &Map<String, Value>) -> AppResult<RuleSet> {
    let alias = format!("{ALIAS_PATTERN}|unique:{CATEGORIES_TABLE}");
    let parent = parent_rules(payload.get("parent_id"), None);
    Ok(RuleSet::new()
        .field("name", "required")?
        .field("alias", &alias)?
        .field("image", "string")?
        .field("description", "string")?
        .field("parent_id", &parent)?
        .field("order", INTEGER_COLUMN)?
        .field("status", INTEGER_COLUMN)?)
}

fn update_rules(payload: &Map<String, Value>, category: &Category) -> AppResult<RuleSet> {
    let alias = format!("{ALIAS_PATTERN}|unique:{CATEGORIES_TABLE},alias,{}", category.id);
    let parent = parent_rules(payload.get("parent_id"), Some(category.id));
    Ok(RuleSet::new()
        .field("name", "string")?
        .field("alias", &alias)?
        .field("image", "string")?
        .field("description", "string")?
        .field("parent_id", &parent)?
        .field("order", INTEGER_COLUMN)?
        .field("status", INTEGER_COLUMN)?)
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| AppError::NotFound)
}

pub async fn list_categories(state: &AppState, query: CategoryBrowseQuery) -> AppResult<CategoryBrowse> {
    let page = state.categories.browse(&query.criteria()).await?;
    let meta = Meta::new(Some(query.page), query.limit, page.total, page.next_cursor);
    Ok(CategoryBrowse {
        categories: page.items,
        meta,
    })
}

pub async fn create_category(state: &AppState, payload: Map<String, Value>) -> AppResult<CategoryRead> {
    state
        .validator(state.categories.presence())
        .validate(&payload, &store_rules(&payload)?)
        .await?;

    let input = CategoryInput::from_payload(&payload)?;
    let category = state.categories.create(input).await?;
    tracing::debug!(category_id = category.id, "category created");
    Ok(CategoryRead { category })
}

pub async fn get_category(state: &AppState, id_or_alias: &str) -> AppResult<CategoryRead> {
    let category = state
        .categories
        .find_by_id_or_alias(id_or_alias)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(CategoryRead { category })
}

pub async fn update_category(
    state: &AppState,
    id: &str,
    payload: Map<String, Value>,
) -> AppResult<CategoryRead> {
    let existing = match state.categories.find(parse_id(id)?).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    state
        .validator(state.categories.presence())
        .validate(&payload, &update_rules(&payload, &existing)?)
        .await?;

    let input = CategoryInput::from_payload(&payload)?;
    let category = state.categories.update(existing, input).await?;
    tracing::debug!(category_id = category.id, "category updated");
    Ok(CategoryRead { category })
}

pub async fn delete_category(state: &AppState, id: &str) -> AppResult<()> {
    let existing = match state.categories.find(parse_id(id)?).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    if !state.categories.delete(&existing).await? {
        tracing::warn!(category_id = existing.id, "category delete reported failure");
        return Err(AppError::StoreFailure);
    }
    tracing::debug!(category_id = existing.id, "category deleted");
    Ok(())
}
