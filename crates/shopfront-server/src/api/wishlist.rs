//! Authenticated wishlist endpoints.
//!
//! Mutations return the canonical full list; removal is idempotent so
//! clients that drifted from the server converge instead of erroring.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shopfront_core::Product;
use shopfront_db::DbError;

use crate::middleware::{AuthUser, RequestId};

use super::{map_db_error, map_fk_violation, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct WishlistBody {
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AddWishlistRequest {
    pub product_id: i64,
}

pub(super) async fn load_wishlist_body(
    pool: &PgPool,
    user: AuthUser,
) -> Result<WishlistBody, DbError> {
    let rows = shopfront_db::list_wishlist_products(pool, user.0).await?;
    Ok(WishlistBody {
        items: rows.into_iter().map(Product::from).collect(),
    })
}

/// GET /api/v1/wishlist
pub(super) async fn get_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<WishlistBody>>, ApiError> {
    let data = load_wishlist_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/wishlist/items — add a product (duplicate adds are no-ops).
pub(super) async fn add_wishlist_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddWishlistRequest>,
) -> Result<Json<ApiResponse<WishlistBody>>, ApiError> {
    let rid = &req_id.0;

    shopfront_db::insert_wishlist_item(&state.pool, user.0, body.product_id)
        .await
        .map_err(|e| {
            map_fk_violation(
                rid,
                &e,
                &format!("no product {} to add to the wishlist", body.product_id),
            )
        })?;

    let data = load_wishlist_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/wishlist/items/:product_id — remove a product.
/// Removing a product that is not present still returns the canonical list.
pub(super) async fn remove_wishlist_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<WishlistBody>>, ApiError> {
    let rid = &req_id.0;

    shopfront_db::delete_wishlist_item(&state.pool, user.0, product_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let data = load_wishlist_body(&state.pool, user)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/wishlist — empty the wishlist.
pub(super) async fn clear_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<WishlistBody>>, ApiError> {
    let rid = &req_id.0;

    shopfront_db::clear_wishlist(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: WishlistBody { items: Vec::new() },
        meta: ResponseMeta::new(req_id.0),
    }))
}
