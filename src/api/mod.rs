use axum::{
    Json,
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::GeminiClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, ContentAssistService, SeaOrmAuthService, TokenService};

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod blogs;
pub mod careers;
mod error;
pub mod products;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub assist: Arc<ContentAssistService>,

    pub config: Arc<Config>,

    pub start_time: std::time::Instant,
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    create_app_state(config, store)
}

/// Wires the services over an already connected store. Tests use this
/// directly with an in-memory database.
pub fn create_app_state(config: Config, store: Store) -> anyhow::Result<Arc<AppState>> {
    let secret = config
        .auth
        .resolved_jwt_secret()
        .ok_or_else(|| anyhow::anyhow!("No session secret configured"))?;
    let tokens = TokenService::new(&secret, config.auth.token_ttl_days)?;

    let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        tokens,
        config.security.clone(),
        config.auth.clone(),
    ));

    let gemini = match (config.ai.enabled, config.ai.resolved_api_key()) {
        (true, Some(key)) => Some(GeminiClient::new(
            &config.ai.base_url,
            &config.ai.model,
            &key,
        )?),
        _ => None,
    };
    let assist = Arc::new(ContentAssistService::new(gemini));

    Ok(Arc::new(AppState {
        store,
        auth_service,
        assist,
        config: Arc::new(config),
        start_time: std::time::Instant::now(),
    }))
}

pub(crate) const fn page_params(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    PageQuery {
        page: match page {
            Some(p) => p,
            None => 1,
        },
        limit: match limit {
            Some(l) => l,
            None => 10,
        },
    }
    .clamped()
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Response {
    let db_ready = state.store.ping().await.is_ok();

    let status = if db_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if db_ready { "ok" } else { "degraded" },
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    (status, Json(ApiResponse::success(body))).into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/blogs", get(blogs::list_blogs))
        .route("/blogs/{slug}", get(blogs::get_blog_by_slug))
        .route("/products", get(products::list_products))
        .route("/products/{slug}", get(products::get_product_by_slug))
        .route("/careers", get(careers::list_careers))
        .route("/careers/{slug}", get(careers::get_career_by_slug))
        .route("/analytics/track", post(analytics::track))
        .route("/assistant/chat", post(assistant::chat))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        .route(
            "/auth/admins/{id}/permissions",
            put(auth::update_permissions),
        )
        .route("/blogs", post(blogs::create_blog))
        // Mutations address rows by numeric id; the path segment shares the
        // public route's parameter name because matchit allows only one name
        // per position.
        .route("/blogs/{slug}", put(blogs::update_blog))
        .route("/blogs/{slug}", delete(blogs::delete_blog))
        .route("/blogs/ai/generate", post(blogs::ai_generate))
        .route("/blogs/ai/meta-description", post(blogs::ai_meta_description))
        .route("/blogs/ai/tags", post(blogs::ai_tags))
        .route("/blogs/ai/seo-analysis", post(blogs::ai_seo_analysis))
        .route("/blogs/ai/improve", post(blogs::ai_improve))
        .route("/products", post(products::create_product))
        .route("/products/{slug}", put(products::update_product))
        .route("/products/{slug}", delete(products::delete_product))
        .route("/products/ai/description", post(products::ai_description))
        .route("/careers", post(careers::create_career))
        .route("/careers/{slug}", put(careers::update_career))
        .route("/careers/{slug}", delete(careers::delete_career))
        .route("/careers/ai/generate", post(careers::ai_generate))
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/trends", get(analytics::trends))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
