use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::{CategoryBrowse, CategoryRead, CategoryRequest},
        products::{ProductBrowse, ProductRead, ProductRequest},
    },
    models::{Category, Product},
    response::{ErrorEnvelope, FieldError, Meta},
    routes::{categories, health, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
    ),
    components(
        schemas(
            Product,
            Category,
            ProductRequest,
            CategoryRequest,
            ProductRead,
            ProductBrowse,
            CategoryRead,
            CategoryBrowse,
            ErrorEnvelope,
            FieldError,
            Meta,
            health::HealthData,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Category endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
