use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentAdmin;
use super::{ApiError, ApiResponse, AppState, Paginated};
use crate::db::BlogFilter;
use crate::models::admin::{Action, Resource};
use crate::models::blog::{Blog, BlogInput};
use crate::services::SeoAnalysis;

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

/// GET /blogs
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Paginated<Blog>>, ApiError> {
    let (page, limit) = super::page_params(query.page, query.limit);
    let filter = BlogFilter {
        status: query.status,
        category: query.category,
        featured: query.featured,
        search: query.search,
    };

    let (blogs, total) = state.store.list_blogs(&filter, page, limit).await?;
    Ok(Json(Paginated::new(blogs, page, limit, total)))
}

/// GET /blogs/{slug}
///
/// Public detail view; each hit counts one view.
pub async fn get_blog_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    let blog = state
        .store
        .get_blog_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog", &slug))?;

    state.store.increment_blog_views(blog.id).await?;

    Ok(Json(ApiResponse::success(Blog {
        views: blog.views + 1,
        ..blog
    })))
}

/// POST /blogs
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<BlogInput>,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    if !admin.allows(Resource::Blogs, Action::Create) {
        return Err(ApiError::forbidden());
    }

    input.validate().map_err(ApiError::validation)?;

    if state.store.blog_slug_exists(&input.slug).await? {
        return Err(ApiError::Conflict(format!(
            "Blog slug '{}' already exists",
            input.slug
        )));
    }

    let blog = state.store.create_blog(&input).await?;
    Ok(Json(ApiResponse::success(blog)))
}

/// PUT /blogs/{id}
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i32>,
    Json(input): Json<BlogInput>,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    if !admin.allows(Resource::Blogs, Action::Update) {
        return Err(ApiError::forbidden());
    }

    input.validate().map_err(ApiError::validation)?;

    let blog = state
        .store
        .update_blog(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog", id))?;

    Ok(Json(ApiResponse::success(blog)))
}

/// DELETE /blogs/{id}
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if !admin.allows(Resource::Blogs, Action::Delete) {
        return Err(ApiError::forbidden());
    }

    if !state.store.remove_blog(id).await? {
        return Err(ApiError::not_found("Blog", id));
    }

    Ok(Json(ApiResponse::success(
        "Blog deleted successfully".to_string(),
    )))
}

// AI assistance for the blog editor. Authentication is enough; these do not
// touch stored content.

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

#[derive(Debug, Serialize)]
pub struct GeneratedContent {
    pub content: String,
}

/// POST /blogs/ai/generate
pub async fn ai_generate(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GeneratedContent>>, ApiError> {
    if payload.topic.trim().is_empty() {
        return Err(ApiError::validation("Topic is required"));
    }

    let content = state
        .assist
        .generate_blog_content(&payload.topic, &payload.prompt, &payload.tone)
        .await;

    Ok(Json(ApiResponse::success(GeneratedContent { content })))
}

#[derive(Debug, Deserialize)]
pub struct TitleContentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MetaDescriptionResponse {
    pub meta_description: String,
}

/// POST /blogs/ai/meta-description
pub async fn ai_meta_description(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<TitleContentRequest>,
) -> Result<Json<ApiResponse<MetaDescriptionResponse>>, ApiError> {
    if payload.title.is_empty() || payload.content.is_empty() {
        return Err(ApiError::validation("Title and content are required"));
    }

    let meta_description = state
        .assist
        .meta_description(&payload.title, &payload.content)
        .await;

    Ok(Json(ApiResponse::success(MetaDescriptionResponse {
        meta_description,
    })))
}

#[derive(Debug, Deserialize)]
pub struct TagsRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_tag_count")]
    pub count: usize,
}

const fn default_tag_count() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

/// POST /blogs/ai/tags
pub async fn ai_tags(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<TagsRequest>,
) -> Result<Json<ApiResponse<TagsResponse>>, ApiError> {
    if payload.title.is_empty() || payload.content.is_empty() {
        return Err(ApiError::validation("Title and content are required"));
    }

    let tags = state
        .assist
        .suggest_tags(&payload.title, &payload.content, payload.count)
        .await;

    Ok(Json(ApiResponse::success(TagsResponse { tags })))
}

#[derive(Debug, Deserialize)]
pub struct SeoAnalysisRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub meta_description: Option<String>,
}

/// POST /blogs/ai/seo-analysis
pub async fn ai_seo_analysis(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<SeoAnalysisRequest>,
) -> Result<Json<ApiResponse<SeoAnalysis>>, ApiError> {
    if payload.title.is_empty() || payload.content.is_empty() {
        return Err(ApiError::validation("Title and content are required"));
    }

    let analysis = state
        .assist
        .analyze_seo(
            &payload.title,
            &payload.content,
            payload.meta_description.as_deref(),
        )
        .await;

    Ok(Json(ApiResponse::success(analysis)))
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_focus")]
    pub focus: String,
}

fn default_focus() -> String {
    "general".to_string()
}

/// POST /blogs/ai/improve
pub async fn ai_improve(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(payload): Json<ImproveRequest>,
) -> Result<Json<ApiResponse<GeneratedContent>>, ApiError> {
    if payload.content.is_empty() {
        return Err(ApiError::validation("Content is required"));
    }

    let content = state
        .assist
        .improve_content(&payload.content, &payload.focus)
        .await;

    Ok(Json(ApiResponse::success(GeneratedContent { content })))
}
