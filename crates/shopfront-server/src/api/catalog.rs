//! Public catalog listings.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use shopfront_core::catalog::CatalogKind;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<shopfront_db::CatalogEntryRow> for CatalogEntry {
    fn from(row: shopfront_db::CatalogEntryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

async fn list_kind(
    state: &AppState,
    req_id: String,
    kind: CatalogKind,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, ApiError> {
    let rows = shopfront_db::list_entries(&state.pool, kind)
        .await
        .map_err(|e| map_db_error(req_id.clone(), &e))?;
    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CatalogEntry::from).collect(),
        meta: ResponseMeta::new(req_id),
    }))
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, ApiError> {
    list_kind(&state, req_id.0, CatalogKind::Brand).await
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, ApiError> {
    list_kind(&state, req_id.0, CatalogKind::Category).await
}

pub(super) async fn list_product_types(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, ApiError> {
    list_kind(&state, req_id.0, CatalogKind::ProductType).await
}

#[derive(Debug, Deserialize)]
pub(super) struct SubcategoryQuery {
    /// Flexible parent-category identifier: id, exact name, or slug.
    pub category: Option<String>,
}

pub(super) async fn list_subcategories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SubcategoryQuery>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, ApiError> {
    let rid = &req_id.0;

    let rows = match query.category.as_deref() {
        None => shopfront_db::list_entries(&state.pool, CatalogKind::Subcategory)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?,
        Some(ident) => {
            let category_id =
                shopfront_db::resolve_entry_id(&state.pool, CatalogKind::Category, ident)
                    .await
                    .map_err(|e| map_db_error(rid.clone(), &e))?;
            match category_id {
                Some(id) => shopfront_db::catalog::list_subcategories_of(&state.pool, id)
                    .await
                    .map_err(|e| map_db_error(rid.clone(), &e))?,
                None => Vec::new(),
            }
        }
    };

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CatalogEntry::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
