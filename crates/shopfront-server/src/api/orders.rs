//! Order placement and history.
//!
//! Creating an order consumes the cart: unit prices are snapshotted and the
//! cart is cleared in the same transaction, which is why the client's
//! `clear()` never needs a server call after checkout.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::middleware::{AuthUser, RequestId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct OrderBody {
    pub id: i64,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemBody>,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderItemBody {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderSummary {
    pub id: i64,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

async fn order_body(
    state: &AppState,
    rid: &str,
    order: shopfront_db::OrderRow,
) -> Result<OrderBody, ApiError> {
    let items = shopfront_db::list_order_items(&state.pool, order.id)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;
    Ok(OrderBody {
        id: order.id,
        subtotal: order.subtotal,
        created_at: order.created_at,
        items: items
            .into_iter()
            .map(|i| OrderItemBody {
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
            })
            .collect(),
    })
}

/// POST /api/v1/orders — place an order from the current cart.
pub(super) async fn create_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<OrderBody>>), ApiError> {
    let rid = &req_id.0;

    let order = shopfront_db::create_order_from_cart(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let Some(order) = order else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "cannot place an order from an empty cart",
        ));
    };

    let data = order_body(&state, rid, order).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/orders — the user's orders, newest first.
pub(super) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<OrderSummary>>>, ApiError> {
    let rows = shopfront_db::list_orders(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse {
        data: rows
            .into_iter()
            .map(|o| OrderSummary {
                id: o.id,
                subtotal: o.subtotal,
                created_at: o.created_at,
            })
            .collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/orders/:order_id
pub(super) async fn get_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<i64>,
) -> Result<Json<ApiResponse<OrderBody>>, ApiError> {
    let rid = &req_id.0;

    let order = shopfront_db::get_order(&state.pool, user.0, order_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let Some(order) = order else {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("no order {order_id}"),
        ));
    };

    let data = order_body(&state, rid, order).await?;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
