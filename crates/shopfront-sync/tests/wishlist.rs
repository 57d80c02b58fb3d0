//! Wishlist reconciliation tests against a mocked storefront API.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rust_decimal::Decimal;
use shopfront_api::StorefrontClient;
use shopfront_core::Product;
use shopfront_sync::{GuestStore, MemoryStore, Session, WishlistService, GUEST_WISHLIST_KEY};

fn client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::with_timeout(&server.uri(), 30).expect("client construction")
}

fn meta() -> serde_json::Value {
    serde_json::json!({ "request_id": "req-test", "timestamp": "2026-03-01T12:00:00Z" })
}

fn make_product(id: i64) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        description: None,
        images: vec![],
        price: Decimal::from(25),
        sale_price: None,
        is_active: true,
    }
}

fn product_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "slug": format!("product-{id}"),
        "description": null,
        "images": [],
        "price": "25",
        "sale_price": null,
        "is_active": true
    })
}

fn error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "error": { "code": code, "message": message }, "meta": meta() })
}

#[tokio::test]
async fn guest_add_gives_immediate_membership_and_persists() {
    let server = MockServer::start().await;
    let store = MemoryStore::new();
    let mut svc = WishlistService::new(client(&server), &store, Session::guest());

    svc.add(make_product(1)).await.expect("guest add");

    assert!(svc.contains(1), "membership holds with no network at all");
    let raw = store
        .get(GUEST_WISHLIST_KEY)
        .expect("store read")
        .expect("record");
    let stored: Vec<Product> = serde_json::from_str(&raw).expect("snapshot array");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 1);
    assert_eq!(stored[0].name, "Product 1");
}

#[tokio::test]
async fn authenticated_add_replaces_list_with_canonical_response() {
    let server = MockServer::start().await;

    // Server already held product 2; the canonical list has both.
    let body = serde_json::json!({
        "data": { "items": [product_json(1), product_json(2)] },
        "meta": meta()
    });
    Mock::given(method("POST"))
        .and(path("/api/v1/wishlist/items"))
        .and(body_json(serde_json::json!({ "product_id": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut svc = WishlistService::new(client(&server), &store, Session::with_token("user-token"));

    svc.add(make_product(1)).await.expect("authenticated add");

    assert_eq!(svc.items().len(), 2, "local list replaced wholesale");
    assert!(svc.contains(1));
    assert!(svc.contains(2));
}

#[tokio::test]
async fn failed_authenticated_add_reverts_optimistic_insert() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/wishlist/items"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(error_body("internal_error", "boom")),
        )
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut svc = WishlistService::new(client(&server), &store, Session::with_token("user-token"));

    let err = svc.add(make_product(1)).await.expect_err("500 should error");
    assert!(!err.is_unauthorized());
    assert!(
        !svc.contains(1),
        "optimistic insert reverted; no partial state"
    );
    assert!(svc.is_authenticated(), "a plain 500 keeps the token");
}

#[tokio::test]
async fn unauthorized_add_drops_token_and_falls_back_to_guest_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/wishlist/items"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body("unauthorized", "stale token")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let session = Session::with_token("stale-token");
    let mut svc = WishlistService::new(client(&server), &store, session.clone());

    let err = svc.add(make_product(1)).await.expect_err("401 should error");
    assert!(err.is_unauthorized());
    assert!(!svc.contains(1), "insert reverted");
    assert!(!session.is_authenticated(), "stale token cleared");

    // The rest of the session runs storage-backed: no further server calls
    // (the mock's expect(1) would trip otherwise).
    svc.add(make_product(1)).await.expect("guest-mode add");
    assert!(svc.contains(1));
    assert!(store.get(GUEST_WISHLIST_KEY).unwrap().is_some());
}

#[tokio::test]
async fn failed_remove_reverts_optimistic_removal() {
    let server = MockServer::start().await;

    let two_items = serde_json::json!({
        "data": { "items": [product_json(1), product_json(2)] },
        "meta": meta()
    });
    Mock::given(method("GET"))
        .and(path("/api/v1/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&two_items))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/wishlist/items/1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(error_body("internal_error", "boom")),
        )
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut svc = WishlistService::new(client(&server), &store, Session::with_token("user-token"));
    svc.refresh().await.expect("seed from server");

    svc.remove(1).await.expect_err("500 should error");
    assert!(svc.contains(1), "removal reverted");
    assert!(svc.contains(2));
}

#[tokio::test]
async fn successful_remove_replaces_with_canonical_list() {
    let server = MockServer::start().await;

    let two_items = serde_json::json!({
        "data": { "items": [product_json(1), product_json(2)] },
        "meta": meta()
    });
    let one_item = serde_json::json!({
        "data": { "items": [product_json(2)] },
        "meta": meta()
    });
    Mock::given(method("GET"))
        .and(path("/api/v1/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&two_items))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/wishlist/items/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_item))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut svc = WishlistService::new(client(&server), &store, Session::with_token("user-token"));
    svc.refresh().await.expect("seed from server");

    svc.remove(1).await.expect("remove");
    assert!(!svc.contains(1));
    assert!(svc.contains(2));
}

#[tokio::test]
async fn guest_refresh_loads_persisted_snapshots() {
    let server = MockServer::start().await;
    let store = MemoryStore::new();
    store
        .set(
            GUEST_WISHLIST_KEY,
            &serde_json::to_string(&vec![make_product(4)]).expect("encode"),
        )
        .expect("seed store");

    let mut svc = WishlistService::new(client(&server), &store, Session::guest());
    svc.refresh().await.expect("refresh");

    assert!(svc.contains(4));
    assert_eq!(svc.items()[0].price, Decimal::from(25));
}

#[tokio::test]
async fn guest_clear_removes_storage_key() {
    let server = MockServer::start().await;
    let store = MemoryStore::new();
    let mut svc = WishlistService::new(client(&server), &store, Session::guest());

    svc.add(make_product(1)).await.expect("add");
    svc.clear().await.expect("clear");

    assert!(svc.items().is_empty());
    assert_eq!(store.get(GUEST_WISHLIST_KEY).unwrap(), None);
}
