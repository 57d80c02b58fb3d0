//! Typed HTTP client for the shopfront REST API.
//!
//! Wraps `reqwest` with storefront-specific error handling and typed
//! response deserialization. Authentication is a bearer token supplied per
//! call; callers that hold no token use the public endpoints only.

mod client;
mod error;
mod types;

pub use client::{ProductListQuery, StorefrontClient};
pub use error::ApiClientError;
pub use types::{ApiEnvelope, CartItemPayload, CartPayload, ResponseMeta, WishlistPayload};
