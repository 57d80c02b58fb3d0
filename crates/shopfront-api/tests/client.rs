//! Integration tests for `StorefrontClient` using wiremock HTTP mocks.

use shopfront_api::{ProductListQuery, StorefrontClient};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> StorefrontClient {
    StorefrontClient::with_timeout(base_url, 30).expect("client construction should not fail")
}

fn meta() -> serde_json::Value {
    serde_json::json!({
        "request_id": "req-test",
        "timestamp": "2026-03-01T12:00:00Z"
    })
}

#[tokio::test]
async fn get_product_returns_parsed_product() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": {
            "id": 3,
            "name": "Ceramic Mug",
            "slug": "ceramic-mug",
            "description": "A 12oz stoneware mug.",
            "images": ["https://cdn.example.com/mug.jpg"],
            "price": "12.50",
            "sale_price": null,
            "is_active": true
        },
        "meta": meta()
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/products/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let product = client.get_product(3).await.expect("should parse product");

    assert_eq!(product.id, 3);
    assert_eq!(product.name, "Ceramic Mug");
    assert_eq!(product.slug, "ceramic-mug");
    assert!(product.sale_price.is_none());
}

#[tokio::test]
async fn list_products_sends_filters_as_query_params() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": [
            {
                "id": 3,
                "name": "Ceramic Mug",
                "slug": "ceramic-mug",
                "description": null,
                "images": [],
                "price": "12.50",
                "sale_price": null,
                "is_active": true
            }
        ],
        "meta": meta()
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .and(query_param("category", "drinkware"))
        .and(query_param("search", "mug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client
        .list_products(&ProductListQuery {
            category: Some("drinkware".to_string()),
            search: Some("mug".to_string()),
            ..ProductListQuery::default()
        })
        .await
        .expect("should parse product list");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "ceramic-mug");
}

#[tokio::test]
async fn add_cart_item_sends_bearer_token_and_body() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": {
            "id": 11,
            "items": [
                {
                    "id": 1,
                    "product_id": 3,
                    "quantity": 2,
                    "product": {
                        "name": "Ceramic Mug",
                        "images": [],
                        "price": "12.50",
                        "sale_price": null
                    }
                }
            ],
            "item_count": 2,
            "subtotal": "25.00"
        },
        "meta": meta()
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/cart/items"))
        .and(header("authorization", "Bearer user-token"))
        .and(body_json(
            serde_json::json!({ "product_id": 3, "quantity": 2 }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let cart = client
        .add_cart_item("user-token", 3, 2)
        .await
        .expect("should parse cart");

    assert_eq!(cart.id, 11);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.item_count, 2);
}

#[tokio::test]
async fn update_cart_item_patches_quantity() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": { "id": 11, "items": [], "item_count": 0, "subtotal": "0" },
        "meta": meta()
    });

    Mock::given(method("PATCH"))
        .and(path("/api/v1/cart/items/7"))
        .and(body_json(serde_json::json!({ "quantity": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let cart = client
        .update_cart_item("user-token", 7, 5)
        .await
        .expect("should parse cart");
    assert_eq!(cart.id, 11);
}

#[tokio::test]
async fn unauthorized_response_is_distinguishable() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error": { "code": "unauthorized", "message": "invalid bearer token" },
        "meta": meta()
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/wishlist"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_wishlist("stale-token")
        .await
        .expect_err("401 should error");

    assert!(err.is_unauthorized(), "expected unauthorized, got: {err}");
    assert!(
        err.to_string().contains("invalid bearer token"),
        "expected server message in error, got: {err}"
    );
}

#[tokio::test]
async fn server_error_surfaces_status_and_message() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error": { "code": "internal_error", "message": "database query failed" },
        "meta": meta()
    });

    Mock::given(method("PATCH"))
        .and(path("/api/v1/cart/items/9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .update_cart_item("user-token", 9, 2)
        .await
        .expect_err("500 should error");

    assert!(!err.is_unauthorized());
    assert!(
        err.to_string().contains("500"),
        "expected status in error, got: {err}"
    );
}

#[tokio::test]
async fn remove_wishlist_item_returns_canonical_list() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": {
            "items": [
                {
                    "id": 2,
                    "name": "Linen Throw Pillow",
                    "slug": "linen-throw-pillow",
                    "description": null,
                    "images": [],
                    "price": "49.99",
                    "sale_price": null,
                    "is_active": true
                }
            ]
        },
        "meta": meta()
    });

    Mock::given(method("DELETE"))
        .and(path("/api/v1/wishlist/items/9"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let wishlist = client
        .remove_wishlist_item("user-token", 9)
        .await
        .expect("should parse wishlist");

    assert_eq!(wishlist.items.len(), 1);
    assert_eq!(wishlist.items[0].id, 2);
}

#[tokio::test]
async fn malformed_body_yields_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": \"nope\"}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_product(1).await.expect_err("should fail");
    assert!(
        err.to_string().contains("get_product(1)"),
        "expected context in error, got: {err}"
    );
}
