use serde_json::{Map, Value};

use crate::{
    dto::products::{ProductBrowse, ProductInput, ProductRead},
    error::{AppError, AppResult},
    models::Product,
    response::Meta,
    routes::params::ProductBrowseQuery,
    state::AppState,
    store::PRODUCTS_TABLE,
    validation::{RuleRegistry, RuleSet},
};

pub(crate) const ALIAS_PATTERN: &str = "regex:/^[a-z0-9-]+/";

/// Registers the `json` rule: the value must be a string holding valid JSON.
pub fn register_rules(registry: &mut RuleRegistry) {
    registry.extend("json", is_json_encoding, json_message);
}

fn is_json_encoding(value: &Value, _parameters: &[String]) -> bool {
    value
        .as_str()
        .is_some_and(|raw| serde_json::from_str::<Value>(raw).is_ok())
}

fn json_message(attribute: &str, _parameters: &[String]) -> String {
    format!("The {attribute} must be an JSON encoding.")
}

fn store_rules() -> AppResult<RuleSet> {
    let alias = format!("{ALIAS_PATTERN}|unique:{PRODUCTS_TABLE}");
    Ok(RuleSet::new()
        .field("title", "required")?
        .field("alias", &alias)?
        .field("image", "string")?
        .field("description", "string")?
        .field("price", "numeric")?
        .field("galleries", "array")?)
}

fn update_rules(product: &Product) -> AppResult<RuleSet> {
    let alias = format!("{ALIAS_PATTERN}|unique:{PRODUCTS_TABLE},alias,{}", product.id);
    Ok(RuleSet::new()
        .field("title", "string")?
        .field("alias", &alias)?
        .field("image", "string")?
        .field("description", "string")?
        .field("price", "numeric")?
        .field("galleries", "array")?)
}

/// Route ids are numeric; anything else cannot name a product.
fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| AppError::NotFound)
}

pub async fn list_products(state: &AppState, query: ProductBrowseQuery) -> AppResult<ProductBrowse> {
    let page = state.products.browse(&query.criteria()).await?;
    let meta = Meta::new(None, query.limit, page.total, page.next_cursor);
    Ok(ProductBrowse {
        products: page.items,
        meta,
    })
}

pub async fn create_product(state: &AppState, payload: Map<String, Value>) -> AppResult<ProductRead> {
    state
        .validator(state.products.presence())
        .validate(&payload, &store_rules()?)
        .await?;

    let input = ProductInput::from_payload(&payload)?;
    let product = state.products.create(input).await?;
    tracing::debug!(product_id = product.id, "product created");
    Ok(ProductRead { product })
}

pub async fn get_product(state: &AppState, id_or_alias: &str) -> AppResult<ProductRead> {
    let product = state
        .products
        .find_by_id_or_alias(id_or_alias)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ProductRead { product })
}

pub async fn update_product(
    state: &AppState,
    id: &str,
    payload: Map<String, Value>,
) -> AppResult<ProductRead> {
    let existing = match state.products.find(parse_id(id)?).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    state
        .validator(state.products.presence())
        .validate(&payload, &update_rules(&existing)?)
        .await?;

    let input = ProductInput::from_payload(&payload)?;
    let product = state.products.update(existing, input).await?;
    tracing::debug!(product_id = product.id, "product updated");
    Ok(ProductRead { product })
}

pub async fn delete_product(state: &AppState, id: &str) -> AppResult<()> {
    let existing = match state.products.find(parse_id(id)?).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if !state.products.delete(&existing).await? {
        tracing::warn!(product_id = existing.id, "product delete reported failure");
        return Err(AppError::StoreFailure);
    }
    tracing::debug!(product_id = existing.id, "product deleted");
    Ok(())
}
