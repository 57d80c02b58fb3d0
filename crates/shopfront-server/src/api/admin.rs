//! Admin product management.
//!
//! Catalog references in these request bodies are flexible identifiers —
//! a numeric id, an exact name, or a slug — resolved through the
//! id → name → slug fallback chain before the write.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use shopfront_core::catalog::{slug_from_name, CatalogKind};
use shopfront_core::Product;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub product_type: Option<String>,
}

// Option<Option<T>> is intentional: outer None = "not in request" (keep current),
// Some(None) = "explicitly cleared", Some(Some(v)) = "set to value" (PATCH semantics).
#[allow(clippy::option_option)]
#[derive(Debug, Deserialize)]
pub(super) struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sale_price: Option<Option<Decimal>>,
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub brand: Option<Option<String>>,
    #[serde(default)]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub subcategory: Option<Option<String>>,
    #[serde(default)]
    pub product_type: Option<Option<String>>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_name(req_id: &str, name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim().to_owned();
    if trimmed.is_empty() || trimmed.len() > 200 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "name must be 1–200 characters",
        ));
    }
    Ok(trimmed)
}

fn validate_price(req_id: &str, field: &str, value: Decimal) -> Result<(), ApiError> {
    if value < Decimal::ZERO {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'{field}' must not be negative, got {value}"),
        ));
    }
    Ok(())
}

/// Resolves a flexible catalog identifier or rejects the request naming the
/// unresolvable field.
async fn resolve_required(
    pool: &PgPool,
    req_id: &str,
    kind: CatalogKind,
    ident: &str,
) -> Result<i64, ApiError> {
    let resolved = shopfront_db::resolve_entry_id(pool, kind, ident)
        .await
        .map_err(|e| map_db_error(req_id.to_owned(), &e))?;
    resolved.ok_or_else(|| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("unknown {kind}: '{ident}'"),
        )
    })
}

fn map_unique_violation(req_id: &str, e: &shopfront_db::DbError) -> ApiError {
    if let shopfront_db::DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::new(req_id, "conflict", "a product with that slug already exists");
        }
    }
    map_db_error(req_id.to_owned(), e)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/products — create a product.
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let rid = &req_id.0;

    let name = validate_name(rid, &body.name)?;
    validate_price(rid, "price", body.price)?;
    if let Some(sale_price) = body.sale_price {
        validate_price(rid, "sale_price", sale_price)?;
    }

    let mut new = shopfront_db::NewProduct {
        slug: slug_from_name(&name),
        name,
        description: body.description,
        price: body.price,
        sale_price: body.sale_price,
        images: body.images.unwrap_or_default(),
        brand_id: None,
        category_id: None,
        subcategory_id: None,
        product_type_id: None,
    };
    if let Some(ident) = body.brand.as_deref() {
        new.brand_id = Some(resolve_required(&state.pool, rid, CatalogKind::Brand, ident).await?);
    }
    if let Some(ident) = body.category.as_deref() {
        new.category_id =
            Some(resolve_required(&state.pool, rid, CatalogKind::Category, ident).await?);
    }
    if let Some(ident) = body.subcategory.as_deref() {
        new.subcategory_id =
            Some(resolve_required(&state.pool, rid, CatalogKind::Subcategory, ident).await?);
    }
    if let Some(ident) = body.product_type.as_deref() {
        new.product_type_id =
            Some(resolve_required(&state.pool, rid, CatalogKind::ProductType, ident).await?);
    }

    let row = shopfront_db::create_product(&state.pool, &new)
        .await
        .map_err(|e| map_unique_violation(rid, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/admin/products/:product_id — sparse product update.
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let rid = &req_id.0;

    let mut patch = shopfront_db::ProductPatch::default();

    if let Some(ref name) = body.name {
        let name = validate_name(rid, name)?;
        patch.slug = Some(slug_from_name(&name));
        patch.name = Some(name);
    }
    if let Some(description) = body.description {
        patch.description = Some(description);
    }
    if let Some(price) = body.price {
        validate_price(rid, "price", price)?;
        patch.price = Some(price);
    }
    if let Some(sale_price) = body.sale_price {
        if let Some(value) = sale_price {
            validate_price(rid, "sale_price", value)?;
        }
        patch.sale_price = Some(sale_price);
    }
    if let Some(images) = body.images {
        patch.images = Some(images);
    }
    patch.brand_id =
        resolve_patch_field(&state.pool, rid, CatalogKind::Brand, body.brand).await?;
    patch.category_id =
        resolve_patch_field(&state.pool, rid, CatalogKind::Category, body.category).await?;
    patch.subcategory_id =
        resolve_patch_field(&state.pool, rid, CatalogKind::Subcategory, body.subcategory).await?;
    patch.product_type_id =
        resolve_patch_field(&state.pool, rid, CatalogKind::ProductType, body.product_type).await?;
    if let Some(is_active) = body.is_active {
        patch.is_active = Some(is_active);
    }

    if patch.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "request body carries no updatable field",
        ));
    }

    let row = shopfront_db::update_product(&state.pool, product_id, &patch)
        .await
        .map_err(|e| map_unique_violation(rid, &e))?;
    let Some(row) = row else {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("no product {product_id}"),
        ));
    };

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Resolves one PATCH-semantics catalog field: absent stays absent,
/// explicit null clears, a value resolves through the fallback chain.
#[allow(clippy::option_option)]
async fn resolve_patch_field(
    pool: &PgPool,
    req_id: &str,
    kind: CatalogKind,
    field: Option<Option<String>>,
) -> Result<Option<Option<i64>>, ApiError> {
    match field {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(ident)) => {
            let id = resolve_required(pool, req_id, kind, &ident).await?;
            Ok(Some(Some(id)))
        }
    }
}
