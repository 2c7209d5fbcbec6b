use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentAdmin;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{AnalyticsEvent, DayStats};
use crate::models::blog::Blog;
use crate::models::product::Product;

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub event: String,
    pub page: Option<String>,
    #[serde(default)]
    pub data: TrackData,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackData {
    pub blog_id: Option<i32>,
    pub product_id: Option<i32>,
    pub career_id: Option<i32>,
}

fn decode_event(payload: &TrackRequest) -> Option<AnalyticsEvent> {
    match payload.event.as_str() {
        "page_view" => Some(AnalyticsEvent::PageView {
            page: payload.page.clone(),
        }),
        "blog_view" => payload
            .data
            .blog_id
            .map(|blog_id| AnalyticsEvent::BlogView { blog_id }),
        "product_view" => payload
            .data
            .product_id
            .map(|product_id| AnalyticsEvent::ProductView { product_id }),
        "contact_form" => Some(AnalyticsEvent::ContactForm),
        "career_application" => Some(AnalyticsEvent::CareerApplication),
        "ai_interaction" => Some(AnalyticsEvent::AssistantInteraction),
        "unique_visitor" => Some(AnalyticsEvent::UniqueVisitor),
        _ => None,
    }
}

/// POST /analytics/track
///
/// Public and best-effort; unknown events and view events without an id are
/// acknowledged without touching the counters.
pub async fn track(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if let Some(event) = decode_event(&payload) {
        state.store.track_event(event).await?;
    }

    // An application also bumps the posting's own applicant counter.
    if payload.event == "career_application"
        && let Some(career_id) = payload.data.career_id
    {
        state.store.increment_career_applicants(career_id).await?;
    }

    Ok(Json(ApiResponse::success("Event tracked".to_string())))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct DashboardTotals {
    pub page_views: i64,
    pub unique_visitors: i64,
    pub contact_forms: i64,
    pub applications: i64,
    pub ai_interactions: i64,
}

#[derive(Debug, Serialize)]
pub struct ContentCounts {
    pub blogs: u64,
    pub products: u64,
    pub careers: u64,
}

#[derive(Debug, Serialize)]
pub struct TopContent {
    pub blogs: Vec<Blog>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub counts: ContentCounts,
    pub top_content: TopContent,
    pub timeline: Vec<DayStats>,
}

/// GET /analytics/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    if !admin.allows_analytics() {
        return Err(ApiError::forbidden());
    }

    let timeline = state
        .store
        .recent_analytics_days(query.start_date.as_deref(), query.end_date.as_deref(), 30)
        .await?;

    let mut totals = DashboardTotals::default();
    for day in &timeline {
        totals.page_views += day.total_page_views();
        totals.unique_visitors += day.unique_visitors;
        totals.contact_forms += day.contact_form_submissions;
        totals.applications += day.career_applications;
        totals.ai_interactions += day.assistant_interactions;
    }

    let counts = ContentCounts {
        blogs: state.store.count_blogs_with_status("published").await?,
        products: state.store.count_products_with_status("launched").await?,
        careers: state.store.count_careers_with_status("open").await?,
    };

    let top_content = TopContent {
        blogs: state.store.top_published_blogs(5).await?,
        products: state.store.top_launched_products(5).await?,
    };

    Ok(Json(ApiResponse::success(Dashboard {
        totals,
        counts,
        top_content,
        timeline,
    })))
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub page_views: i64,
    pub unique_visitors: i64,
    pub engagement: i64,
}

/// GET /analytics/trends
pub async fn trends(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<ApiResponse<Vec<TrendPoint>>>, ApiError> {
    if !admin.allows_analytics() {
        return Err(ApiError::forbidden());
    }

    let days = query.days.unwrap_or(30).clamp(1, 365);
    let start_date = (chrono::Utc::now() - chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string();

    let timeline = state.store.analytics_days_since(&start_date).await?;

    let trends = timeline
        .into_iter()
        .map(|day| TrendPoint {
            page_views: day.total_page_views(),
            unique_visitors: day.unique_visitors,
            engagement: day.assistant_interactions + day.contact_form_submissions,
            date: day.date,
        })
        .collect();

    Ok(Json(ApiResponse::success(trends)))
}
