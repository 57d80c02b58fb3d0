//! Authenticated cart endpoints.
//!
//! Every mutation returns the full updated cart so clients replace their
//! state wholesale instead of patching it.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shopfront_core::ProductSnapshot;
use shopfront_db::{CartItemWithProduct, DbError};

use crate::middleware::{AuthUser, RequestId};

use super::{map_db_error, map_fk_violation, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CartBody {
    pub id: i64,
    pub items: Vec<CartItemBody>,
    pub item_count: i64,
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize)]
pub(super) struct CartItemBody {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub product: ProductSnapshot,
}

#[derive(Debug, Deserialize)]
pub(super) struct AddItemRequest {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateItemRequest {
    pub quantity: i32,
}

/// Loads the user's cart (creating it on first touch) with derived totals
/// recomputed from the lines.
pub(super) async fn load_cart_body(pool: &PgPool, user: AuthUser) -> Result<CartBody, DbError> {
    let cart = shopfront_db::get_or_create_cart(pool, user.0).await?;
    let items = shopfront_db::list_cart_items(pool, cart.id).await?;

    let item_count = items.iter().map(|i| i64::from(i.quantity)).sum();
    let subtotal = items.iter().map(CartItemWithProduct::line_total).sum();

    Ok(CartBody {
        id: cart.id,
        items: items
            .into_iter()
            .map(|i| CartItemBody {
                id: i.id,
                product_id: i.product_id,
                quantity: i.quantity,
                product: ProductSnapshot {
                    name: i.name,
                    images: i.images,
                    price: i.price,
                    sale_price: i.sale_price,
                },
            })
            .collect(),
        item_count,
        subtotal,
    })
}

fn validate_quantity(req_id: &str, quantity: i32) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("quantity must be at least 1, got {quantity}"),
        ));
    }
    Ok(())
}

/// GET /api/v1/cart
pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<CartBody>>, ApiError> {
    let data = load_cart_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/cart/items — add a product; an existing line for the same
/// product is incremented, never duplicated.
pub(super) async fn add_cart_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartBody>>, ApiError> {
    let rid = &req_id.0;
    validate_quantity(rid, body.quantity)?;

    let cart = shopfront_db::get_or_create_cart(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    shopfront_db::upsert_cart_item(&state.pool, cart.id, body.product_id, body.quantity)
        .await
        .map_err(|e| {
            map_fk_violation(
                rid,
                &e,
                &format!("no product {} to add to the cart", body.product_id),
            )
        })?;

    let data = load_cart_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/cart/items/:item_id — set a line's quantity.
pub(super) async fn update_cart_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<CartBody>>, ApiError> {
    let rid = &req_id.0;
    validate_quantity(rid, body.quantity)?;

    let cart = shopfront_db::get_or_create_cart(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let updated = shopfront_db::set_cart_item_quantity(&state.pool, cart.id, item_id, body.quantity)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if updated.is_none() {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("no cart line {item_id}"),
        ));
    }

    let data = load_cart_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/cart/items/:item_id — remove a line.
pub(super) async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<CartBody>>, ApiError> {
    let rid = &req_id.0;

    let cart = shopfront_db::get_or_create_cart(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let removed = shopfront_db::delete_cart_item(&state.pool, cart.id, item_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if !removed {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("no cart line {item_id}"),
        ));
    }

    let data = load_cart_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
