use axum::{
    Json,
    extract::{FromRequestParts, Path, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::admin::{Admin, PermissionSet};
use crate::services::{AuthError, RegisterInput};
use crate::services::{LoginResult, TokenService};

#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// An authenticated admin, pulled out of request extensions where the
/// middleware parked it.
pub struct CurrentAdmin(pub Admin);

impl<S> FromRequestParts<S> for CurrentAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Admin>()
            .cloned()
            .map(Self)
            .ok_or_else(ApiError::unauthorized)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(TokenService::extract_from_header)
        .map(str::trim)
}

/// Session validation middleware for the protected route tree.
///
/// Every failure short of a database outage collapses into the same 401 so
/// callers cannot probe which part of the check failed.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&headers) else {
        return Err(ApiError::unauthorized());
    };

    let admin = match state.auth_service.authenticate(token).await {
        Ok(admin) => admin,
        Err(AuthError::Database(msg)) => return Err(ApiError::DatabaseError(msg)),
        Err(_) => return Err(ApiError::unauthorized()),
    };

    tracing::Span::current().record("admin_id", admin.id.as_str());
    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// POST /auth/register
///
/// Provisioning new admins sits behind the settings permission.
pub async fn register(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(payload): Json<RegisterInput>,
) -> Result<Json<ApiResponse<Admin>>, ApiError> {
    if !admin.allows_settings() {
        return Err(ApiError::forbidden());
    }

    let created = state.auth_service.register(payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// PUT /auth/admins/{id}/permissions
///
/// Replaces the target's matrix. Super-admin targets keep their forced
/// all-true grid; the gate re-reads the matrix per request so the change
/// takes effect on the target's next call.
pub async fn update_permissions(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<String>,
    Json(permissions): Json<PermissionSet>,
) -> Result<Json<ApiResponse<Admin>>, ApiError> {
    if !admin.allows_settings() {
        return Err(ApiError::forbidden());
    }

    if state.store.find_admin_by_id(&id).await?.is_none() {
        return Err(ApiError::not_found("Admin", &id));
    }

    state.store.update_admin_permissions(&id, permissions).await?;

    let updated = state
        .store
        .find_admin_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin", &id))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// GET /auth/me
pub async fn me(
    CurrentAdmin(admin): CurrentAdmin,
) -> Result<Json<ApiResponse<Admin>>, ApiError> {
    Ok(Json(ApiResponse::success(admin)))
}
