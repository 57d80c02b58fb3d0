//! Database operations for `carts` and `cart_items`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `carts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartRow {
    pub id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `cart_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItemRow {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its product's display fields, in add order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItemWithProduct {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub name: String,
    pub images: Vec<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
}

impl CartItemWithProduct {
    /// Quantity times effective price for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.sale_price.unwrap_or(self.price)
    }
}

/// Returns the user's cart, creating it on first use. Exactly one cart per
/// user (`user_id` is unique).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn get_or_create_cart(pool: &PgPool, user_id: Uuid) -> Result<CartRow, DbError> {
    let row = sqlx::query_as::<_, CartRow>(
        "INSERT INTO carts (user_id) VALUES ($1) \
         ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW() \
         RETURNING id, user_id, created_at, updated_at",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns the cart's lines joined with product display fields, oldest
/// first (add order).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_cart_items(
    pool: &PgPool,
    cart_id: i64,
) -> Result<Vec<CartItemWithProduct>, DbError> {
    let rows = sqlx::query_as::<_, CartItemWithProduct>(
        "SELECT ci.id, ci.product_id, ci.quantity, \
                p.name, p.images, p.price, p.sale_price \
         FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = $1 \
         ORDER BY ci.created_at",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Adds `quantity` of a product to the cart. A line for the product already
/// in the cart is incremented instead of duplicated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails (including a foreign-key
/// violation for an unknown product).
pub async fn upsert_cart_item(
    pool: &PgPool,
    cart_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<CartItemRow, DbError> {
    let row = sqlx::query_as::<_, CartItemRow>(
        "INSERT INTO cart_items (cart_id, product_id, quantity) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (cart_id, product_id) DO UPDATE SET \
             quantity = cart_items.quantity + EXCLUDED.quantity, \
             updated_at = NOW() \
         RETURNING id, cart_id, product_id, quantity, created_at, updated_at",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Sets a line's quantity. Returns `None` when no such line exists in this
/// cart.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_cart_item_quantity(
    pool: &PgPool,
    cart_id: i64,
    item_id: i64,
    quantity: i32,
) -> Result<Option<CartItemRow>, DbError> {
    let row = sqlx::query_as::<_, CartItemRow>(
        "UPDATE cart_items \
         SET quantity = $1, updated_at = NOW() \
         WHERE id = $2 AND cart_id = $3 \
         RETURNING id, cart_id, product_id, quantity, created_at, updated_at",
    )
    .bind(quantity)
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Deletes a line. Returns `true` when a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_cart_item(pool: &PgPool, cart_id: i64, item_id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
        .bind(item_id)
        .bind(cart_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes every line from the cart. Returns the number of lines removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_cart(pool: &PgPool, cart_id: i64) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_prefers_sale_price() {
        let line = CartItemWithProduct {
            id: 1,
            product_id: 1,
            quantity: 3,
            name: "Mug".to_string(),
            images: vec![],
            price: Decimal::from(100),
            sale_price: Some(Decimal::from(80)),
        };
        assert_eq!(line.line_total(), Decimal::from(240));
    }

    #[test]
    fn line_total_falls_back_to_regular_price() {
        let line = CartItemWithProduct {
            id: 1,
            product_id: 1,
            quantity: 2,
            name: "Mug".to_string(),
            images: vec![],
            price: Decimal::from(100),
            sale_price: None,
        };
        assert_eq!(line.line_total(), Decimal::from(200));
    }
}
