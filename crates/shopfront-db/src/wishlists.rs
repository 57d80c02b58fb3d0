//! Database operations for `wishlist_items`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::products::ProductRow;
use crate::DbError;

/// Returns the user's wishlisted products, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_wishlist_products(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT p.id, p.name, p.slug, p.description, p.price, p.sale_price, p.images, \
                p.brand_id, p.category_id, p.subcategory_id, p.product_type_id, \
                p.is_active, p.created_at, p.updated_at \
         FROM wishlist_items wi \
         JOIN products p ON p.id = wi.product_id \
         WHERE wi.user_id = $1 \
         ORDER BY wi.created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Adds a product to the user's wishlist. Duplicate membership is a no-op.
/// Returns `true` when a row was inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a foreign-key
/// violation for an unknown product).
pub async fn insert_wishlist_item(
    pool: &PgPool,
    user_id: Uuid,
    product_id: i64,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, product_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(product_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes a product from the user's wishlist. Returns `true` when a row
/// was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_wishlist_item(
    pool: &PgPool,
    user_id: Uuid,
    product_id: i64,
) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Empties the user's wishlist. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_wishlist(pool: &PgPool, user_id: Uuid) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
