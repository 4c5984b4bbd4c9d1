use shoppingcart_api::{
    config::{AppConfig, StoreKind},
    state::AppState,
};

fn config(product_store: StoreKind, category_store: StoreKind) -> AppConfig {
    AppConfig {
        database_url: None,
        host: "127.0.0.1".into(),
        port: 3000,
        product_store,
        category_store,
    }
}

#[test]
fn memory_stores_need_no_connection() {
    let state = AppState::from_config(&config(StoreKind::Memory, StoreKind::Memory), None);
    assert!(state.is_ok());
}

#[test]
fn database_store_without_connection_is_rejected() {
    let result = AppState::from_config(&config(StoreKind::Memory, StoreKind::Database), None);
    assert!(result.is_err());
}
