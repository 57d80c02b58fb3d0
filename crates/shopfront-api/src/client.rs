//! HTTP client for the shopfront REST API.
//!
//! One method per endpoint, each returning the server's typed payload. All
//! non-2xx responses are surfaced as [`ApiClientError::Status`] with the
//! message extracted from the server's error envelope, so callers can
//! distinguish 401 (stale token) from 404 (missing record) from the rest.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use shopfront_core::Product;

use crate::error::ApiClientError;
use crate::types::{ApiEnvelope, CartPayload, WishlistPayload};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional filters for [`StorefrontClient::list_products`].
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
    pub on_sale: bool,
    pub limit: Option<i64>,
}

/// Client for the shopfront REST API.
///
/// Use [`StorefrontClient::new`] for production or
/// [`StorefrontClient::with_timeout`] to tune the request timeout; both
/// accept any base URL, so tests point them at a wiremock server.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    /// Creates a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with an explicit request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopfront/0.1 (storefront-client)")
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        // Validate once up front so later format!-built URLs cannot fail.
        Url::parse(trimmed)
            .map_err(|e| ApiClientError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
        })
    }

    // -- products ----------------------------------------------------------

    /// Lists products (public endpoint), optionally filtered. Catalog
    /// filters accept the same flexible identifiers the server resolves
    /// (numeric id, exact name, or slug).
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Status`] on a non-2xx response.
    /// - [`ApiClientError::Http`] on network failure.
    /// - [`ApiClientError::Deserialize`] if the body does not match.
    pub async fn list_products(
        &self,
        query: &ProductListQuery,
    ) -> Result<Vec<Product>, ApiClientError> {
        let url = format!("{}/api/v1/products", self.base_url);
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        if let Some(brand) = &query.brand {
            params.push(("brand", brand.clone()));
        }
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if query.on_sale {
            params.push(("on_sale", "true".to_owned()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let request = self.client.get(&url).query(&params);
        self.request::<Vec<Product>>(request, "list_products").await
    }

    /// Fetches a product by id (public endpoint).
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Status`] on a non-2xx response (404 for an
    ///   unknown or inactive product).
    /// - [`ApiClientError::Http`] on network failure.
    /// - [`ApiClientError::Deserialize`] if the body does not match.
    pub async fn get_product(&self, product_id: i64) -> Result<Product, ApiClientError> {
        let url = format!("{}/api/v1/products/{product_id}", self.base_url);
        let request = self.client.get(&url);
        self.request::<Product>(request, &format!("get_product({product_id})"))
            .await
    }

    // -- cart --------------------------------------------------------------

    /// Fetches the authenticated user's cart.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 401 when `token` is stale.
    pub async fn get_cart(&self, token: &str) -> Result<CartPayload, ApiClientError> {
        let url = format!("{}/api/v1/cart", self.base_url);
        let request = self.client.get(&url).bearer_auth(token);
        self.request::<CartPayload>(request, "get_cart").await
    }

    /// Adds `quantity` of a product to the authenticated user's cart and
    /// returns the full updated cart.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 401 when `token` is stale.
    pub async fn add_cart_item(
        &self,
        token: &str,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartPayload, ApiClientError> {
        let url = format!("{}/api/v1/cart/items", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "product_id": product_id, "quantity": quantity }));
        self.request::<CartPayload>(request, &format!("add_cart_item({product_id})"))
            .await
    }

    /// Sets a cart line's quantity and returns the full updated cart.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 404 when the line is gone.
    pub async fn update_cart_item(
        &self,
        token: &str,
        item_id: i64,
        quantity: i32,
    ) -> Result<CartPayload, ApiClientError> {
        let url = format!("{}/api/v1/cart/items/{item_id}", self.base_url);
        let request = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "quantity": quantity }));
        self.request::<CartPayload>(request, &format!("update_cart_item({item_id})"))
            .await
    }

    /// Removes a cart line and returns the full updated cart.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 404 when the line is gone.
    pub async fn remove_cart_item(
        &self,
        token: &str,
        item_id: i64,
    ) -> Result<CartPayload, ApiClientError> {
        let url = format!("{}/api/v1/cart/items/{item_id}", self.base_url);
        let request = self.client.delete(&url).bearer_auth(token);
        self.request::<CartPayload>(request, &format!("remove_cart_item({item_id})"))
            .await
    }

    // -- wishlist ----------------------------------------------------------

    /// Fetches the authenticated user's wishlist.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 401 when `token` is stale.
    pub async fn get_wishlist(&self, token: &str) -> Result<WishlistPayload, ApiClientError> {
        let url = format!("{}/api/v1/wishlist", self.base_url);
        let request = self.client.get(&url).bearer_auth(token);
        self.request::<WishlistPayload>(request, "get_wishlist").await
    }

    /// Adds a product to the wishlist and returns the canonical full list.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 401 when `token` is stale.
    pub async fn add_wishlist_item(
        &self,
        token: &str,
        product_id: i64,
    ) -> Result<WishlistPayload, ApiClientError> {
        let url = format!("{}/api/v1/wishlist/items", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "product_id": product_id }));
        self.request::<WishlistPayload>(request, &format!("add_wishlist_item({product_id})"))
            .await
    }

    /// Removes a product from the wishlist and returns the canonical full
    /// list.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 401 when `token` is stale.
    pub async fn remove_wishlist_item(
        &self,
        token: &str,
        product_id: i64,
    ) -> Result<WishlistPayload, ApiClientError> {
        let url = format!("{}/api/v1/wishlist/items/{product_id}", self.base_url);
        let request = self.client.delete(&url).bearer_auth(token);
        self.request::<WishlistPayload>(request, &format!("remove_wishlist_item({product_id})"))
            .await
    }

    /// Empties the authenticated user's wishlist.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::get_product`]; 401 when `token` is stale.
    pub async fn clear_wishlist(&self, token: &str) -> Result<(), ApiClientError> {
        let url = format!("{}/api/v1/wishlist", self.base_url);
        let request = self.client.delete(&url).bearer_auth(token);
        self.request::<serde_json::Value>(request, "clear_wishlist")
            .await?;
        Ok(())
    }

    // -- plumbing ----------------------------------------------------------

    /// Sends the request, maps non-2xx statuses to
    /// [`ApiClientError::Status`], and unwraps the `{data, meta}` envelope.
    async fn request<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, ApiClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| ApiClientError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;
        Ok(envelope.data)
    }
}

/// Pulls `error.message` out of the server's error envelope, falling back to
/// the raw body (truncated) when the body is not that shape.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| {
            let mut raw = body.trim().to_owned();
            raw.truncate(200);
            raw
        })
}
