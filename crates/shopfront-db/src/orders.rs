//! Database operations for `orders` and `order_items`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::carts::CartItemWithProduct;
use crate::DbError;

/// A row from the `orders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: Uuid,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Creates an order from the user's cart in one transaction: snapshots the
/// unit price of each line (sale price when set), inserts the order and its
/// items, and clears the cart. Returns `None` when the user has no cart or
/// an empty one.
///
/// Client-side `clear()` relies on this: after order placement the server
/// cart is already empty, so no separate clear call is needed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction rolls
/// back as a whole.
pub async fn create_order_from_cart(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<OrderRow>, DbError> {
    let mut tx = pool.begin().await?;

    let cart_id: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(cart_id) = cart_id else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, CartItemWithProduct>(
        "SELECT ci.id, ci.product_id, ci.quantity, \
                p.name, p.images, p.price, p.sale_price \
         FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = $1 \
         ORDER BY ci.created_at",
    )
    .bind(cart_id)
    .fetch_all(&mut *tx)
    .await?;
    if items.is_empty() {
        return Ok(None);
    }

    let subtotal: Decimal = items.iter().map(CartItemWithProduct::line_total).sum();

    let order = sqlx::query_as::<_, OrderRow>(
        "INSERT INTO orders (user_id, subtotal) VALUES ($1, $2) \
         RETURNING id, user_id, subtotal, created_at",
    )
    .bind(user_id)
    .bind(subtotal)
    .fetch_one(&mut *tx)
    .await?;

    for item in &items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.sale_price.unwrap_or(item.price))
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(order))
}

/// Returns the user's orders, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<OrderRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, subtotal, created_at \
         FROM orders WHERE user_id = $1 \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one of the user's orders, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_order(
    pool: &PgPool,
    user_id: Uuid,
    order_id: i64,
) -> Result<Option<OrderRow>, DbError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, subtotal, created_at \
         FROM orders WHERE id = $1 AND user_id = $2",
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Returns an order's lines in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_order_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItemRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, quantity, unit_price \
         FROM order_items WHERE order_id = $1 \
         ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
