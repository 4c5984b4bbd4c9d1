mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{delete, get, messages_for, post, put};

async fn create(app: &axum::Router, body: Value) -> i64 {
    let (status, body) = post(app, "/api/categories", body).await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    body.unwrap()["category"]["id"].as_i64().unwrap()
}

fn ids(body: &Option<Value>) -> Vec<i64> {
    body.as_ref().unwrap()["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn create_accepts_zero_or_null_parent() {
    let app = common::app();
    let (status, body) = post(&app, "/api/categories", json!({ "name": "Root", "parent_id": 0 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["category"]["parent_id"], 0);

    let (status, body) = post(&app, "/api/categories", json!({ "name": "Loose", "parent_id": null })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["category"]["parent_id"], Value::Null);
}

#[tokio::test]
async fn create_checks_that_parent_exists() {
    let app = common::app();
    let (status, body) = post(&app, "/api/categories", json!({ "name": "Orphan", "parent_id": 42 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages_for(&body, "parent_id"), vec!["The selected parent id is invalid."]);

    let parent = create(&app, json!({ "name": "Apparel", "alias": "apparel" })).await;
    let (status, body) = post(
        &app,
        "/api/categories",
        json!({ "name": "Hoodies", "alias": "hoodies", "parent_id": parent.to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["category"]["parent_id"], parent);
}

#[tokio::test]
async fn create_requires_name_and_numeric_fields() {
    let app = common::app();
    let (status, body) = post(
        &app,
        "/api/categories",
        json!({ "parent_id": "abc", "order": "first", "alias": "Not Valid" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages_for(&body, "name"), vec!["The name field is required."]);
    assert_eq!(messages_for(&body, "order"), vec!["The order must be a number."]);
    assert_eq!(messages_for(&body, "alias"), vec!["The alias format is invalid."]);
    assert!(messages_for(&body, "parent_id").contains(&"The parent id must be a number.".to_string()));
}

#[tokio::test]
async fn update_rejects_self_as_parent() {
    let app = common::app();
    let id = create(&app, json!({ "name": "Loop", "alias": "loop" })).await;

    let (status, body) = put(&app, &format!("/api/categories/{id}"), json!({ "parent_id": id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages_for(&body, "parent_id"), vec!["The selected parent id is invalid."]);

    let (status, body) = put(&app, &format!("/api/categories/{id}"), json!({ "parent_id": 0, "alias": "loop" })).await;
    assert_eq!(status, StatusCode::OK);
    let category = body.unwrap()["category"].clone();
    assert_eq!(category["parent_id"], 0);
    assert_eq!(category["name"], "Loop");
}

#[tokio::test]
async fn update_and_delete_missing_category_are_404() {
    let app = common::app();
    let (status, body) = put(&app, "/api/categories/7", json!({ "name": "Ghost" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Some(Value::Null));

    let (status, _) = delete(&app, "/api/categories/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_by_alias_then_delete() {
    let app = common::app();
    let id = create(&app, json!({ "name": "Accessories", "alias": "accessories" })).await;

    let (status, body) = get(&app, "/api/categories/accessories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["category"]["id"], id);

    let (status, body) = delete(&app, &format!("/api/categories/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, None);

    let (status, _) = get(&app, "/api/categories/accessories").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_sorts_pages_and_filters() {
    let app = common::app();
    create(&app, json!({ "name": "C", "order": 3, "status": 1 })).await;
    create(&app, json!({ "name": "A", "order": 1, "status": 0 })).await;
    create(&app, json!({ "name": "B", "order": 2, "status": 1 })).await;

    let (status, body) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 2, 1]);
    let meta = &body.as_ref().unwrap()["meta"];
    assert_eq!(meta["page"], 1);
    assert_eq!(meta["per_page"], 25);
    assert_eq!(meta["total"], 3);

    let (_, body) = get(&app, "/api/categories?sort=order&direction=asc").await;
    assert_eq!(ids(&body), vec![2, 3, 1]);

    let (_, body) = get(&app, "/api/categories?sort=order&direction=asc&limit=2&page=2").await;
    assert_eq!(ids(&body), vec![1]);
    assert_eq!(body.unwrap()["meta"]["page"], 2);

    let (_, body) = get(&app, "/api/categories?status=1&sort=name&direction=asc").await;
    assert_eq!(ids(&body), vec![3, 1]);
    assert_eq!(body.unwrap()["meta"]["total"], 2);
}

#[tokio::test]
async fn index_ignores_unknown_sort_and_filter_keys() {
    let app = common::app();
    create(&app, json!({ "name": "One" })).await;
    create(&app, json!({ "name": "Two" })).await;

    let (status, body) = get(&app, "/api/categories?sort=password&colour=red&page=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2, 1]);
    assert_eq!(body.unwrap()["meta"]["page"], 1);
}

#[tokio::test]
async fn index_cursor_follows_direction() {
    let app = common::app();
    for name in ["a", "b", "c", "d"] {
        create(&app, json!({ "name": name })).await;
    }

    let (_, body) = get(&app, "/api/categories?direction=asc&limit=2").await;
    assert_eq!(ids(&body), vec![1, 2]);
    let cursor = body.unwrap()["meta"]["cursor"].as_str().unwrap().to_string();

    let (_, body) = get(&app, &format!("/api/categories?direction=asc&limit=2&cursor={cursor}")).await;
    assert_eq!(ids(&body), vec![3, 4]);
}

#[tokio::test]
async fn order_and_status_must_fit_an_integer_column() {
    let app = common::app();
    let (status, body) = post(
        &app,
        "/api/categories",
        json!({ "name": "Huge", "order": 1e10, "status": -3e9 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        messages_for(&body, "order"),
        vec!["The order must be between -2147483648 and 2147483647."]
    );
    assert_eq!(
        messages_for(&body, "status"),
        vec!["The status must be between -2147483648 and 2147483647."]
    );

    let (status, body) = post(&app, "/api/categories", json!({ "name": "Fine", "order": 2147483647, "status": "2.9" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let category = body.unwrap()["category"].clone();
    assert_eq!(category["order"], 2147483647);
    assert_eq!(category["status"], 2);
}

#[tokio::test]
async fn update_checks_parent_and_allows_clearing_it() {
    let app = common::app();
    let parent = create(&app, json!({ "name": "Parent" })).await;
    let id = create(&app, json!({ "name": "Child", "parent_id": parent })).await;

    let (status, body) = put(&app, &format!("/api/categories/{id}"), json!({ "parent_id": 999 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages_for(&body, "parent_id"), vec!["The selected parent id is invalid."]);

    let (status, body) = put(&app, &format!("/api/categories/{id}"), json!({ "parent_id": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["category"]["parent_id"], Value::Null);
}

#[tokio::test]
async fn integral_float_parent_id_matches_existing_category() {
    let app = common::app();
    let parent = create(&app, json!({ "name": "Parent" })).await;
    assert_eq!(parent, 1);

    let (status, body) = post(&app, "/api/categories", json!({ "name": "Child", "parent_id": 1.0 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["category"]["parent_id"], 1);
}

#[tokio::test]
async fn category_aliases_are_unique_except_for_their_owner() {
    let app = common::app();
    create(&app, json!({ "name": "Shoes", "alias": "shoes" })).await;
    let id = create(&app, json!({ "name": "Boots", "alias": "boots" })).await;

    let (status, body) = post(&app, "/api/categories", json!({ "name": "Again", "alias": "shoes" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages_for(&body, "alias"), vec!["The alias has already been taken."]);

    let (status, body) = put(&app, &format!("/api/categories/{id}"), json!({ "alias": "shoes" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages_for(&body, "alias"), vec!["The alias has already been taken."]);

    let (status, body) = put(&app, &format!("/api/categories/{id}"), json!({ "alias": "boots", "name": "Tall boots" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["category"]["name"], "Tall boots");
}

#[tokio::test]
async fn far_page_is_empty_not_an_error() {
    let app = common::app();
    create(&app, json!({ "name": "Only" })).await;

    let (status, body) = get(&app, "/api/categories?page=9223372036854775807&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), Vec::<i64>::new());
}

#[test]
fn offset_never_exceeds_sql_range() {
    let params = [("page", "9223372036854775807"), ("limit", "2")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let query = shoppingcart_api::routes::params::CategoryBrowseQuery::from_params(params);
    assert_eq!(query.offset(), i64::MAX as u64);
    assert_eq!(query.criteria().offset, i64::MAX as u64);
}
