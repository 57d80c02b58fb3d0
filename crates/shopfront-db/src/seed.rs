//! Demo catalog seed for local development.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::DbError;
use shopfront_core::catalog::slug_from_name;

async fn upsert_entry(conn: &mut PgConnection, table: &str, name: &str) -> Result<i64, DbError> {
    let sql = format!(
        "INSERT INTO {table} (name, slug) VALUES ($1, $2) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name, updated_at = NOW() \
         RETURNING id"
    );
    let id: i64 = sqlx::query_scalar(&sql)
        .bind(name)
        .bind(slug_from_name(name))
        .fetch_one(conn)
        .await?;
    Ok(id)
}

/// Upserts a small demo catalog: two categories, one subcategory, a brand,
/// a product type, and three products. Safe to run on every startup; all
/// upserts run inside a single transaction and conflict on slug.
///
/// Returns the number of products processed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction rolls
/// back as a whole.
pub async fn seed_demo_catalog(pool: &PgPool) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    let brand_id = upsert_entry(&mut *tx, "brands", "Acme Goods").await?;
    let drinkware_id = upsert_entry(&mut *tx, "categories", "Drinkware").await?;
    let decor_id = upsert_entry(&mut *tx, "categories", "Home Decor").await?;
    let physical_id = upsert_entry(&mut *tx, "product_types", "Physical").await?;

    let mugs_id: i64 = sqlx::query_scalar(
        "INSERT INTO subcategories (category_id, name, slug) VALUES ($1, $2, $3) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name, updated_at = NOW() \
         RETURNING id",
    )
    .bind(drinkware_id)
    .bind("Mugs")
    .bind(slug_from_name("Mugs"))
    .fetch_one(&mut *tx)
    .await?;

    let products: [(&str, Decimal, Option<Decimal>, Option<i64>, i64); 3] = [
        (
            "Ceramic Mug",
            Decimal::new(1250, 2),
            None,
            Some(mugs_id),
            drinkware_id,
        ),
        (
            "Linen Throw Pillow",
            Decimal::new(4999, 2),
            Some(Decimal::new(2999, 2)),
            None,
            decor_id,
        ),
        (
            "Walnut Serving Board",
            Decimal::new(6400, 2),
            None,
            None,
            decor_id,
        ),
    ];

    let mut count = 0_usize;
    for (name, price, sale_price, subcategory_id, category_id) in products {
        sqlx::query(
            "INSERT INTO products \
                 (name, slug, price, sale_price, brand_id, category_id, subcategory_id, product_type_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (slug) DO UPDATE SET \
                 price = EXCLUDED.price, \
                 sale_price = EXCLUDED.sale_price, \
                 updated_at = NOW()",
        )
        .bind(name)
        .bind(slug_from_name(name))
        .bind(price)
        .bind(sale_price)
        .bind(brand_id)
        .bind(category_id)
        .bind(subcategory_id)
        .bind(physical_id)
        .execute(&mut *tx)
        .await?;
        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
