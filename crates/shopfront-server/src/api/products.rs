//! Storefront product listing and detail.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use sqlx::PgPool;

use shopfront_core::catalog::CatalogKind;
use shopfront_core::Product;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    /// Flexible identifiers: numeric id, exact name, or slug.
    pub brand: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub product_type: Option<String>,
    pub search: Option<String>,
    pub on_sale: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolves one optional catalog filter. `Given(None)` means the caller
/// named a brand/category/... that matched nothing — the listing is then
/// empty rather than erroring.
enum Filter {
    NotGiven,
    Given(Option<i64>),
}

async fn resolve_filter(
    pool: &PgPool,
    req_id: &str,
    kind: CatalogKind,
    ident: Option<&str>,
) -> Result<Filter, ApiError> {
    match ident {
        None => Ok(Filter::NotGiven),
        Some(ident) => {
            let resolved = shopfront_db::resolve_entry_id(pool, kind, ident)
                .await
                .map_err(|e| map_db_error(req_id.to_owned(), &e))?;
            Ok(Filter::Given(resolved))
        }
    }
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let rid = &req_id.0;
    let mut filters = shopfront_db::ProductListFilters {
        search: query.search.as_deref(),
        on_sale_only: query.on_sale.unwrap_or(false),
        limit: normalize_limit(query.limit),
        offset: query.offset.unwrap_or(0).max(0),
        ..shopfront_db::ProductListFilters::default()
    };

    let mut unmatched_filter = false;
    let resolutions = [
        (CatalogKind::Brand, query.brand.as_deref()),
        (CatalogKind::Category, query.category.as_deref()),
        (CatalogKind::Subcategory, query.subcategory.as_deref()),
        (CatalogKind::ProductType, query.product_type.as_deref()),
    ];
    for (kind, ident) in resolutions {
        match resolve_filter(&state.pool, rid, kind, ident).await? {
            Filter::NotGiven => {}
            Filter::Given(None) => unmatched_filter = true,
            Filter::Given(Some(id)) => match kind {
                CatalogKind::Brand => filters.brand_id = Some(id),
                CatalogKind::Category => filters.category_id = Some(id),
                CatalogKind::Subcategory => filters.subcategory_id = Some(id),
                CatalogKind::ProductType => filters.product_type_id = Some(id),
            },
        }
    }

    let data = if unmatched_filter {
        Vec::new()
    } else {
        shopfront_db::list_products(&state.pool, filters)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?
            .into_iter()
            .map(Product::from)
            .collect()
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/products/:ident — product detail by numeric id or slug.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(ident): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let rid = &req_id.0;

    let row = if let Ok(id) = ident.parse::<i64>() {
        shopfront_db::get_active_product(&state.pool, id)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?
    } else {
        shopfront_db::get_product_by_slug(&state.pool, &ident)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?
    };

    let Some(row) = row else {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("no product '{ident}'"),
        ));
    };

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
