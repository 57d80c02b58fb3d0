//! Wire types for the storefront API's JSON envelope and payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use shopfront_core::{Cart, CartId, CartLine, Product, ProductSnapshot, Wishlist};

/// The `{data, meta}` envelope every successful response is wrapped in.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A server-side cart as returned by every cart endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CartPayload {
    pub id: i64,
    pub items: Vec<CartItemPayload>,
    pub item_count: i64,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItemPayload {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub product: ProductSnapshot,
}

impl From<CartPayload> for Cart {
    fn from(payload: CartPayload) -> Self {
        let mut cart = Cart {
            id: CartId::Server(payload.id),
            items: payload
                .items
                .into_iter()
                .map(|item| CartLine {
                    id: Some(item.id),
                    product_id: item.product_id,
                    quantity: item.quantity,
                    product: item.product,
                })
                .collect(),
            item_count: payload.item_count,
            subtotal: payload.subtotal,
        };
        // Server totals are trusted but recomputed anyway so local views can
        // never carry a drifted total.
        cart.recompute_totals();
        cart
    }
}

/// A server-side wishlist: the canonical full product list.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistPayload {
    pub items: Vec<Product>,
}

impl From<WishlistPayload> for Wishlist {
    fn from(payload: WishlistPayload) -> Self {
        Wishlist {
            items: payload.items,
        }
    }
}
