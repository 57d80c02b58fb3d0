//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};

use crate::DbError;
use shopfront_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, sale_price, images, \
     brand_id, category_id, subcategory_id, product_type_id, is_active, created_at, updated_at";

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub images: Vec<String>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub product_type_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            images: row.images,
            price: row.price,
            sale_price: row.sale_price,
            is_active: row.is_active,
        }
    }
}

/// Optional filters for the storefront product listing. All catalog filters
/// are pre-resolved ids; `search` matches the name case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListFilters<'a> {
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub product_type_id: Option<i64>,
    pub search: Option<&'a str>,
    pub on_sale_only: bool,
    pub limit: i64,
    pub offset: i64,
}

/// Fields for product creation. Catalog references are already-resolved ids.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub images: Vec<String>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub product_type_id: Option<i64>,
}

/// Sparse product update. Outer `None` = "not in request" (keep current),
/// `Some(None)` = "explicitly cleared", `Some(Some(v))` = "set to value"
/// (PATCH semantics).
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Option<Decimal>>,
    pub images: Option<Vec<String>>,
    pub brand_id: Option<Option<i64>>,
    pub category_id: Option<Option<i64>>,
    pub subcategory_id: Option<Option<i64>>,
    pub product_type_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

impl ProductPatch {
    /// `true` when the patch carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.sale_price.is_none()
            && self.images.is_none()
            && self.brand_id.is_none()
            && self.category_id.is_none()
            && self.subcategory_id.is_none()
            && self.product_type_id.is_none()
            && self.is_active.is_none()
    }
}

/// Lists active products matching the filters, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    filters: ProductListFilters<'_>,
) -> Result<Vec<ProductRow>, DbError> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = TRUE"
    ));

    if let Some(id) = filters.brand_id {
        qb.push(" AND brand_id = ").push_bind(id);
    }
    if let Some(id) = filters.category_id {
        qb.push(" AND category_id = ").push_bind(id);
    }
    if let Some(id) = filters.subcategory_id {
        qb.push(" AND subcategory_id = ").push_bind(id);
    }
    if let Some(id) = filters.product_type_id {
        qb.push(" AND product_type_id = ").push_bind(id);
    }
    if let Some(search) = filters.search {
        qb.push(" AND name ILIKE ").push_bind(format!("%{search}%"));
    }
    if filters.on_sale_only {
        qb.push(" AND sale_price IS NOT NULL");
    }

    qb.push(" ORDER BY name LIMIT ")
        .push_bind(filters.limit)
        .push(" OFFSET ")
        .push_bind(filters.offset);

    let rows = qb.build_query_as::<ProductRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Returns an active product by id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_active_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_active = TRUE");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Returns a product by id regardless of active state (admin paths).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_id(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Returns an active product by slug, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_slug(pool: &PgPool, slug: &str) -> Result<Option<ProductRow>, DbError> {
    let sql =
        format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1 AND is_active = TRUE");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Inserts a product and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including slug unique
/// violations, which callers map to a conflict).
pub async fn create_product(pool: &PgPool, new: &NewProduct) -> Result<ProductRow, DbError> {
    let sql = format!(
        "INSERT INTO products \
             (name, slug, description, price, sale_price, images, \
              brand_id, category_id, subcategory_id, product_type_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {PRODUCT_COLUMNS}"
    );
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.sale_price)
        .bind(&new.images)
        .bind(new.brand_id)
        .bind(new.category_id)
        .bind(new.subcategory_id)
        .bind(new.product_type_id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Applies a sparse update and returns the updated row, or `None` when the
/// product does not exist. An empty patch still refreshes `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    patch: &ProductPatch,
) -> Result<Option<ProductRow>, DbError> {
    let mut qb = QueryBuilder::new("UPDATE products SET updated_at = NOW()");

    if let Some(name) = &patch.name {
        qb.push(", name = ").push_bind(name.clone());
    }
    if let Some(slug) = &patch.slug {
        qb.push(", slug = ").push_bind(slug.clone());
    }
    if let Some(description) = &patch.description {
        qb.push(", description = ").push_bind(description.clone());
    }
    if let Some(price) = patch.price {
        qb.push(", price = ").push_bind(price);
    }
    if let Some(sale_price) = patch.sale_price {
        qb.push(", sale_price = ").push_bind(sale_price);
    }
    if let Some(images) = &patch.images {
        qb.push(", images = ").push_bind(images.clone());
    }
    if let Some(brand_id) = patch.brand_id {
        qb.push(", brand_id = ").push_bind(brand_id);
    }
    if let Some(category_id) = patch.category_id {
        qb.push(", category_id = ").push_bind(category_id);
    }
    if let Some(subcategory_id) = patch.subcategory_id {
        qb.push(", subcategory_id = ").push_bind(subcategory_id);
    }
    if let Some(product_type_id) = patch.product_type_id {
        qb.push(", product_type_id = ").push_bind(product_type_id);
    }
    if let Some(is_active) = patch.is_active {
        qb.push(", is_active = ").push_bind(is_active);
    }

    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(format!(" RETURNING {PRODUCT_COLUMNS}"));

    let row = qb
        .build_query_as::<ProductRow>()
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_detected() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            price: Some(Decimal::from(10)),
            ..ProductPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn product_row_converts_to_core_product() {
        let row = ProductRow {
            id: 3,
            name: "Ceramic Mug".to_string(),
            slug: "ceramic-mug".to_string(),
            description: None,
            price: Decimal::new(1250, 2),
            sale_price: None,
            images: vec!["https://cdn.example.com/mug.jpg".to_string()],
            brand_id: None,
            category_id: Some(1),
            subcategory_id: None,
            product_type_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let product: Product = row.into();
        assert_eq!(product.id, 3);
        assert_eq!(product.effective_price(), Decimal::new(1250, 2));
    }
}
