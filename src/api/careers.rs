use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentAdmin;
use super::{ApiError, ApiResponse, AppState, Paginated};
use crate::db::CareerFilter;
use crate::models::admin::{Action, Resource};
use crate::models::career::{Career, CareerInput};
use crate::services::JobDraft;

#[derive(Debug, Deserialize)]
pub struct CareerListQuery {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub employment_type: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
}

/// GET /careers
pub async fn list_careers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CareerListQuery>,
) -> Result<Json<Paginated<Career>>, ApiError> {
    let (page, limit) = super::page_params(query.page, query.limit);
    let filter = CareerFilter {
        status: query.status,
        department: query.department,
        employment_type: query.employment_type,
        level: query.level,
        search: query.search,
    };

    let (careers, total) = state.store.list_careers(&filter, page, limit).await?;
    Ok(Json(Paginated::new(careers, page, limit, total)))
}

/// GET /careers/{slug}
pub async fn get_career_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Career>>, ApiError> {
    let career = state
        .store
        .get_career_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Career", &slug))?;

    Ok(Json(ApiResponse::success(career)))
}

/// POST /careers
pub async fn create_career(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<CareerInput>,
) -> Result<Json<ApiResponse<Career>>, ApiError> {
    if !admin.allows(Resource::Careers, Action::Create) {
        return Err(ApiError::forbidden());
    }

    input.validate().map_err(ApiError::validation)?;

    if state.store.career_slug_exists(&input.slug).await? {
        return Err(ApiError::Conflict(format!(
            "Career slug '{}' already exists",
            input.slug
        )));
    }

    let career = state.store.create_career(&input).await?;
    Ok(Json(ApiResponse::success(career)))
}

/// PUT /careers/{id}
pub async fn update_career(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i32>,
    Json(input): Json<CareerInput>,
) -> Result<Json<ApiResponse<Career>>, ApiError> {
    if !admin.allows(Resource::Careers, Action::Update) {
        return Err(ApiError::forbidden());
    }

    input.validate().map_err(ApiError::validation)?;

    let career = state
        .store
        .update_career(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("Career", id))?;

    Ok(Json(ApiResponse::success(career)))
}

/// DELETE /careers/{id}
pub async fn delete_career(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if !admin.allows(Resource::Careers, Action::Delete) {
        return Err(ApiError::forbidden());
    }

    if !state.store.remove_career(id).await? {
        return Err(ApiError::not_found("Career", id));
    }

    Ok(Json(ApiResponse::success(
        "Career deleted successfully".to_string(),
    )))
}

#[derive(Debug, Deserialize)]
pub struct JobDraftRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub level: String,
}

/// POST /careers/ai/generate
pub async fn ai_generate(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<JobDraftRequest>,
) -> Result<Json<ApiResponse<JobDraft>>, ApiError> {
    if payload.title.trim().is_empty() || payload.department.trim().is_empty() {
        return Err(ApiError::validation("Title and department are required"));
    }

    let draft = state
        .assist
        .job_description(&payload.title, &payload.department, &payload.level)
        .await;

    Ok(Json(ApiResponse::success(draft)))
}
