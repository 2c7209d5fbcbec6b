use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentAdmin;
use super::{ApiError, ApiResponse, AppState, Paginated};
use crate::db::ProductFilter;
use crate::models::admin::{Action, Resource};
use crate::models::product::{Product, ProductInput};

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

/// GET /products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Paginated<Product>>, ApiError> {
    let (page, limit) = super::page_params(query.page, query.limit);
    let filter = ProductFilter {
        status: query.status,
        category: query.category,
        featured: query.featured,
        search: query.search,
    };

    let (products, total) = state.store.list_products(&filter, page, limit).await?;
    Ok(Json(Paginated::new(products, page, limit, total)))
}

/// GET /products/{slug}
pub async fn get_product_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let product = state
        .store
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &slug))?;

    Ok(Json(ApiResponse::success(product)))
}

/// POST /products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<ProductInput>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    if !admin.allows(Resource::Products, Action::Create) {
        return Err(ApiError::forbidden());
    }

    input.validate().map_err(ApiError::validation)?;

    if state.store.product_slug_exists(&input.slug).await? {
        return Err(ApiError::Conflict(format!(
            "Product slug '{}' already exists",
            input.slug
        )));
    }

    let product = state.store.create_product(&input).await?;
    Ok(Json(ApiResponse::success(product)))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    if !admin.allows(Resource::Products, Action::Update) {
        return Err(ApiError::forbidden());
    }

    input.validate().map_err(ApiError::validation)?;

    let product = state
        .store
        .update_product(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(Json(ApiResponse::success(product)))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if !admin.allows(Resource::Products, Action::Delete) {
        return Err(ApiError::forbidden());
    }

    if !state.store.remove_product(id).await? {
        return Err(ApiError::not_found("Product", id));
    }

    Ok(Json(ApiResponse::success(
        "Product deleted successfully".to_string(),
    )))
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub description: String,
}

/// POST /products/ai/description
pub async fn ai_description(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<DescriptionRequest>,
) -> Result<Json<ApiResponse<DescriptionResponse>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Product name is required"));
    }

    let description = state
        .assist
        .product_description(&payload.name, &payload.features, &payload.category)
        .await;

    Ok(Json(ApiResponse::success(DescriptionResponse {
        description,
    })))
}
