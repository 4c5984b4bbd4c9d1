use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    ActiveValue::{Set, Unchanged},
    sea_query::{Alias, Asterisk, Expr, Func, Query, SimpleExpr},
};

use crate::{
    dto::{categories::CategoryInput, products::ProductInput},
    entity::{
        categories::{self, Entity as Categories, Model as CategoryModel},
        products::{self, Entity as Products, Model as ProductModel},
    },
    error::AppResult,
    models::{Category, Product},
    routes::params::SortOrder,
    store::{BrowseCriteria, EntityStore, Page},
    validation::{
        PresenceVerifier,
        value::parse_numeric,
    },
};

/// Postgres-backed store built on sea-orm.
#[derive(Clone)]
pub struct DatabaseStore {
    conn: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Applies cursor, ordering and paging to an already filtered select.
    async fn fetch_page<E>(
        &self,
        finder: Select<E>,
        id_column: E::Column,
        sort_column: E::Column,
        criteria: &BrowseCriteria,
    ) -> AppResult<(Vec<E::Model>, u64)>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Send + Sync + 'static,
    {
        let total = finder.clone().count(&self.conn).await?;

        let order = match criteria.direction {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let mut finder = finder;
        if let Some(cursor) = criteria.cursor {
            finder = match criteria.direction {
                SortOrder::Asc => finder.filter(id_column.gt(cursor)),
                SortOrder::Desc => finder.filter(id_column.lt(cursor)),
            };
        }

        let rows = finder
            .order_by(sort_column, order.clone())
            .order_by(id_column, order)
            .limit(criteria.limit)
            .offset(criteria.offset)
            .all(&self.conn)
            .await?;
        Ok((rows, total))
    }
}

fn integer_filter(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Filter values that cannot be read as the column's type match nothing.
fn or_nothing<T>(parsed: Option<T>, build: impl FnOnce(T) -> SimpleExpr) -> SimpleExpr {
    parsed.map(build).unwrap_or_else(|| Expr::value(false))
}

fn product_sort(sort: &str) -> products::Column {
    match sort {
        "title" => products::Column::Title,
        "alias" => products::Column::Alias,
        "image" => products::Column::Image,
        "description" => products::Column::Description,
        "price" => products::Column::Price,
        "created_at" => products::Column::CreatedAt,
        "updated_at" => products::Column::UpdatedAt,
        _ => products::Column::Id,
    }
}

fn product_filter(key: &str, value: &str) -> Option<SimpleExpr> {
    use products::Column;
    let expr = match key {
        "id" => or_nothing(integer_filter(value), |id| Column::Id.eq(id)),
        "title" => Column::Title.eq(value),
        "alias" => Column::Alias.eq(value),
        "image" => Column::Image.eq(value),
        "description" => Column::Description.eq(value),
        "price" => or_nothing(parse_numeric(value), |price| Column::Price.eq(price)),
        _ => return None,
    };
    Some(expr)
}

fn category_sort(sort: &str) -> categories::Column {
    match sort {
        "name" => categories::Column::Name,
        "alias" => categories::Column::Alias,
        "image" => categories::Column::Image,
        "description" => categories::Column::Description,
        "parent_id" => categories::Column::ParentId,
        "order" => categories::Column::SortOrder,
        "status" => categories::Column::Status,
        "created_at" => categories::Column::CreatedAt,
        "updated_at" => categories::Column::UpdatedAt,
        _ => categories::Column::Id,
    }
}

fn category_filter(key: &str, value: &str) -> Option<SimpleExpr> {
    use categories::Column;
    let expr = match key {
        "id" => or_nothing(integer_filter(value), |id| Column::Id.eq(id)),
        "name" => Column::Name.eq(value),
        "alias" => Column::Alias.eq(value),
        "image" => Column::Image.eq(value),
        "description" => Column::Description.eq(value),
        "parent_id" => or_nothing(integer_filter(value), |id| Column::ParentId.eq(id)),
        "order" => or_nothing(integer_filter(value), |n| Column::SortOrder.eq(n)),
        "status" => or_nothing(integer_filter(value), |n| Column::Status.eq(n)),
        _ => return None,
    };
    Some(expr)
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        title: model.title,
        alias: model.alias,
        image: model.image,
        description: model.description,
        price: model.price,
        galleries: model.galleries,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        alias: model.alias,
        image: model.image,
        description: model.description,
        parent_id: model.parent_id,
        order: model.sort_order,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn apply_product(active: &mut products::ActiveModel, input: ProductInput) {
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(alias) = input.alias {
        active.alias = Set(alias);
    }
    if let Some(image) = input.image {
        active.image = Set(image);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(galleries) = input.galleries {
        active.galleries = Set(galleries);
    }
}

fn apply_category(active: &mut categories::ActiveModel, input: CategoryInput) {
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(alias) = input.alias {
        active.alias = Set(alias);
    }
    if let Some(image) = input.image {
        active.image = Set(image);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(parent_id) = input.parent_id {
        active.parent_id = Set(parent_id);
    }
    if let Some(order) = input.order {
        active.sort_order = Set(order);
    }
    if let Some(status) = input.status {
        active.status = Set(status);
    }
}

#[async_trait]
impl EntityStore<Product, ProductInput> for DatabaseStore {
    async fn browse(&self, criteria: &BrowseCriteria) -> AppResult<Page<Product>> {
        let mut condition = Condition::all();
        for (key, value) in &criteria.filters {
            if let Some(expr) = product_filter(key, value) {
                condition = condition.add(expr);
            }
        }

        let (rows, total) = self
            .fetch_page(
                Products::find().filter(condition),
                products::Column::Id,
                product_sort(&criteria.sort),
                criteria,
            )
            .await?;
        let items = rows.into_iter().map(product_from_entity).collect();
        Ok(Page::new(items, total, criteria.limit, |p: &Product| p.id))
    }

    async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let mut active = products::ActiveModel {
            title: Set(String::new()),
            ..Default::default()
        };
        apply_product(&mut active, input);
        let model = active.insert(&self.conn).await?;
        Ok(product_from_entity(model))
    }

    async fn find(&self, id: i64) -> AppResult<Option<Product>> {
        let model = Products::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(product_from_entity))
    }

    async fn find_by_id_or_alias(&self, key: &str) -> AppResult<Option<Product>> {
        if let Ok(id) = key.parse::<i64>() {
            if let Some(model) = Products::find_by_id(id).one(&self.conn).await? {
                return Ok(Some(product_from_entity(model)));
            }
        }
        let model = Products::find()
            .filter(products::Column::Alias.eq(key))
            .one(&self.conn)
            .await?;
        Ok(model.map(product_from_entity))
    }

    async fn update(&self, product: Product, input: ProductInput) -> AppResult<Product> {
        let mut active = products::ActiveModel {
            id: Unchanged(product.id),
            ..Default::default()
        };
        apply_product(&mut active, input);
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.conn).await?;
        Ok(product_from_entity(model))
    }

    async fn delete(&self, product: &Product) -> AppResult<bool> {
        let result = Products::delete_by_id(product.id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    fn presence(&self) -> &dyn PresenceVerifier {
        self
    }
}

#[async_trait]
impl EntityStore<Category, CategoryInput> for DatabaseStore {
    async fn browse(&self, criteria: &BrowseCriteria) -> AppResult<Page<Category>> {
        let mut condition = Condition::all();
        for (key, value) in &criteria.filters {
            if let Some(expr) = category_filter(key, value) {
                condition = condition.add(expr);
            }
        }

        let (rows, total) = self
            .fetch_page(
                Categories::find().filter(condition),
                categories::Column::Id,
                category_sort(&criteria.sort),
                criteria,
            )
            .await?;
        let items = rows.into_iter().map(category_from_entity).collect();
        Ok(Page::new(items, total, criteria.limit, |c: &Category| c.id))
    }

    async fn create(&self, input: CategoryInput) -> AppResult<Category> {
        let mut active = categories::ActiveModel {
            name: Set(String::new()),
            ..Default::default()
        };
        apply_category(&mut active, input);
        let model = active.insert(&self.conn).await?;
        Ok(category_from_entity(model))
    }

    async fn find(&self, id: i64) -> AppResult<Option<Category>> {
        let model = Categories::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(category_from_entity))
    }

    async fn find_by_id_or_alias(&self, key: &str) -> AppResult<Option<Category>> {
        if let Ok(id) = key.parse::<i64>() {
            if let Some(model) = Categories::find_by_id(id).one(&self.conn).await? {
                return Ok(Some(category_from_entity(model)));
            }
        }
        let model = Categories::find()
            .filter(categories::Column::Alias.eq(key))
            .one(&self.conn)
            .await?;
        Ok(model.map(category_from_entity))
    }

    async fn update(&self, category: Category, input: CategoryInput) -> AppResult<Category> {
        let mut active = categories::ActiveModel {
            id: Unchanged(category.id),
            ..Default::default()
        };
        apply_category(&mut active, input);
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.conn).await?;
        Ok(category_from_entity(model))
    }

    async fn delete(&self, category: &Category) -> AppResult<bool> {
        let result = Categories::delete_by_id(category.id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    fn presence(&self) -> &dyn PresenceVerifier {
        self
    }
}

#[async_trait]
impl PresenceVerifier for DatabaseStore {
    async fn count(
        &self,
        table: &str,
        column: &str,
        value: &str,
        excluding: Option<(&str, &str)>,
    ) -> AppResult<u64> {
        let as_text = |name: &str| Expr::expr(Expr::col(Alias::new(name)).cast_as(Alias::new("TEXT")));

        let mut query = Query::select();
        query
            .expr(Func::count(Expr::col(Asterisk)))
            .from(Alias::new(table))
            .and_where(as_text(column).eq(value));
        if let Some((except_column, except_value)) = excluding {
            query.and_where(as_text(except_column).ne(except_value));
        }

        let statement = self.conn.get_database_backend().build(&query);
        let count = match self.conn.query_one(statement).await? {
            Some(row) => row.try_get_by_index::<i64>(0)?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }
}
