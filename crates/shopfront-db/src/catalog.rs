//! Catalog tables and the flexible identifier resolution used by admin
//! product management.

use sqlx::PgPool;

use crate::DbError;
use shopfront_core::catalog::CatalogKind;

/// A row from one of the four catalog tables.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogEntryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Maps a catalog kind to its table. The closed enum is the only source of
/// table names interpolated into SQL here.
const fn table_name(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Brand => "brands",
        CatalogKind::Category => "categories",
        CatalogKind::Subcategory => "subcategories",
        CatalogKind::ProductType => "product_types",
    }
}

/// Returns all entries of one catalog dimension, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_entries(pool: &PgPool, kind: CatalogKind) -> Result<Vec<CatalogEntryRow>, DbError> {
    let sql = format!(
        "SELECT id, name, slug FROM {} ORDER BY name",
        table_name(kind)
    );
    let rows = sqlx::query_as::<_, CatalogEntryRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Returns the subcategories of one category, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_subcategories_of(
    pool: &PgPool,
    category_id: i64,
) -> Result<Vec<CatalogEntryRow>, DbError> {
    let rows = sqlx::query_as::<_, CatalogEntryRow>(
        "SELECT id, name, slug FROM subcategories WHERE category_id = $1 ORDER BY name",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Resolves a client-supplied identifier to a canonical row id.
///
/// Sequential fallback: unique lookup by numeric id, then by exact name
/// (first match wins; order is undefined when names are duplicated), then
/// by slug. Returns `None` when nothing matches. No caching, no batching:
/// this runs once per identifier per request.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any lookup fails.
pub async fn resolve_entry_id(
    pool: &PgPool,
    kind: CatalogKind,
    identifier: &str,
) -> Result<Option<i64>, DbError> {
    let table = table_name(kind);

    if let Ok(id) = identifier.parse::<i64>() {
        let sql = format!("SELECT id FROM {table} WHERE id = $1");
        let found: Option<i64> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;
        if found.is_some() {
            return Ok(found);
        }
    }

    let sql = format!("SELECT id FROM {table} WHERE name = $1 LIMIT 1");
    let by_name: Option<i64> = sqlx::query_scalar(&sql)
        .bind(identifier)
        .fetch_optional(pool)
        .await?;
    if by_name.is_some() {
        return Ok(by_name);
    }

    let sql = format!("SELECT id FROM {table} WHERE slug = $1");
    let by_slug: Option<i64> = sqlx::query_scalar(&sql)
        .bind(identifier)
        .fetch_optional(pool)
        .await?;
    Ok(by_slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_covers_all_kinds() {
        assert_eq!(table_name(CatalogKind::Brand), "brands");
        assert_eq!(table_name(CatalogKind::Category), "categories");
        assert_eq!(table_name(CatalogKind::Subcategory), "subcategories");
        assert_eq!(table_name(CatalogKind::ProductType), "product_types");
    }
}
