use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use vitrine::api::AppState;
use vitrine::config::Config;
use vitrine::db::migrator::{SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD};
use vitrine::services::TokenService;

const TEST_SECRET: &str = "integration-test-secret";

const OFFLINE_EMAIL: &str = "ops@vitrine.local";
const OFFLINE_PASSWORD: &str = "break-glass-pass";
const OFFLINE_TOKEN: &str = "static-recovery-token";

async fn spawn_app_with(config: Config) -> (Router, Arc<AppState>) {
    let store = vitrine::db::Store::new(&config.general.database_path)
        .await
        .expect("Failed to open store");
    let state =
        vitrine::api::create_app_state(config, store).expect("Failed to create app state");
    (vitrine::api::router(state.clone()), state)
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = Some(TEST_SECRET.to_string());
    config
}

async fn spawn_app() -> (Router, Arc<AppState>) {
    spawn_app_with(test_config()).await
}

async fn spawn_offline_app() -> (Router, Arc<AppState>) {
    let mut config = test_config();
    config.auth.offline_fallback = true;
    config.auth.offline_email = Some(OFFLINE_EMAIL.to_string());
    config.auth.offline_password = Some(OFFLINE_PASSWORD.to_string());
    config.auth.offline_token = Some(OFFLINE_TOKEN.to_string());
    config.validate().expect("Offline config should validate");
    spawn_app_with(config).await
}

async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn put_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/auth/login",
        None,
        json!({ "email": email, "password": password }),
    )
    .await
}

async fn seeded_token(app: &Router) -> String {
    let (status, body) = login(app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_returns_token_and_secret_free_admin() {
    let (app, _state) = spawn_app().await;

    let (status, body) = login(&app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().unwrap().contains('.'));

    let admin = &body["data"]["admin"];
    assert_eq!(admin["email"], SEED_ADMIN_EMAIL);
    assert_eq!(admin["role"], "super-admin");
    assert!(admin.get("password_hash").is_none());
    assert!(admin.get("login_attempts").is_none());
    assert!(admin.get("lock_until").is_none());
}

#[tokio::test]
async fn test_me_returns_current_admin() {
    let (app, _state) = spawn_app().await;
    let token = seeded_token(&app).await;

    let (status, body) = get_json(&app, "/api/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], SEED_ADMIN_EMAIL);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let (app, _state) = spawn_app().await;

    let (unknown_status, unknown_body) = login(&app, "ghost@example.com", "whatever1").await;
    let (wrong_status, wrong_body) = login(&app, SEED_ADMIN_EMAIL, "not-the-password").await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body["error"], wrong_body["error"]);

    // A malformed email is just another unknown email, not a 400.
    let (malformed_status, malformed_body) = login(&app, "not-an-email", "whatever1").await;
    assert_eq!(malformed_status, StatusCode::UNAUTHORIZED);
    assert_eq!(malformed_body["error"], wrong_body["error"]);
}

#[tokio::test]
async fn test_missing_fields_fail_validation_before_lookup() {
    let (app, _state) = spawn_app().await;

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": SEED_ADMIN_EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/api/auth/login", None, json!({ "password": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_locks_after_five_failed_attempts() {
    let (app, state) = spawn_app().await;

    for _ in 0..5 {
        let (status, _) = login(&app, SEED_ADMIN_EMAIL, "wrong-password").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Correct password no longer helps while the lock is armed.
    let (status, body) = login(&app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["success"], false);

    let admin = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.login_attempts, 5);
    assert!(admin.lock_until.is_some());
    assert!(admin.is_locked());
}

#[tokio::test]
async fn test_expired_lock_admits_correct_password_and_resets_counter() {
    let (app, state) = spawn_app().await;

    let admin = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    // Zero lockout minutes stamps a lock_until that has already passed.
    state
        .store
        .record_failed_login(&admin.id, 1, 0)
        .await
        .unwrap();

    let armed = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(armed.login_attempts, 1);
    assert!(armed.lock_until.is_some());
    assert!(!armed.is_locked());

    let (status, body) = login(&app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());

    let admin = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.login_attempts, 0);
    assert!(admin.lock_until.is_none());
}

#[tokio::test]
async fn test_successful_login_resets_attempt_counter() {
    let (app, state) = spawn_app().await;

    for _ in 0..3 {
        let (status, _) = login(&app, SEED_ADMIN_EMAIL, "wrong-password").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = login(&app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    let admin = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.login_attempts, 0);
    assert!(admin.lock_until.is_none());
    assert!(admin.last_login.is_some());
}

#[tokio::test]
async fn test_disabled_account_is_rejected_after_password_check() {
    let (app, state) = spawn_app().await;

    let admin = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    state.store.set_admin_active(&admin.id, false).await.unwrap();

    let (status, _) = login(&app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Wrong password on a disabled account still reads as bad credentials.
    let (status, _) = login(&app, SEED_ADMIN_EMAIL, "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_requires_settings_permission() {
    let (app, _state) = spawn_app().await;
    let super_token = seeded_token(&app).await;

    // Seeded super-admin can provision an editor.
    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        Some(&super_token),
        json!({
            "email": "editor@vitrine.local",
            "password": "editor-password",
            "name": "Ed Itor",
            "role": "editor"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "editor");

    // The editor's default matrix has no settings bit.
    let (status, _) = login(&app, "editor@vitrine.local", "editor-password").await;
    assert_eq!(status, StatusCode::OK);
    let (_, login_body) = login(&app, "editor@vitrine.local", "editor-password").await;
    let editor_token = login_body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        Some(&editor_token),
        json!({
            "email": "other@vitrine.local",
            "password": "irrelevant1",
            "name": "Nope"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (app, _state) = spawn_app().await;
    let token = seeded_token(&app).await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        Some(&token),
        json!({
            "email": SEED_ADMIN_EMAIL,
            "password": "some-password",
            "name": "Clone"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_forces_super_admin_matrix() {
    let (app, _state) = spawn_app().await;
    let token = seeded_token(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        Some(&token),
        json!({
            "email": "root2@vitrine.local",
            "password": "super-secret",
            "name": "Second Root",
            "role": "super-admin",
            "permissions": {
                "blogs": { "create": false, "read": false, "update": false, "delete": false },
                "analytics": false,
                "settings": false
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permissions"]["blogs"]["delete"], true);
    assert_eq!(body["data"]["permissions"]["settings"], true);
}

#[tokio::test]
async fn test_permission_update_takes_effect_on_next_request() {
    let (app, _state) = spawn_app().await;
    let super_token = seeded_token(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        Some(&super_token),
        json!({
            "email": "editor@vitrine.local",
            "password": "editor-password",
            "name": "Ed Itor",
            "role": "editor"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let editor_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, login_body) = login(&app, "editor@vitrine.local", "editor-password").await;
    let editor_token = login_body["data"]["token"].as_str().unwrap().to_string();

    // Editing matrices is itself a settings-gated operation.
    let (status, _) = put_json(
        &app,
        &format!("/api/auth/admins/{editor_id}/permissions"),
        Some(&editor_token),
        json!({ "settings": true }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        Some(&editor_token),
        json!({ "email": "x@vitrine.local", "password": "irrelevant1", "name": "X" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = put_json(
        &app,
        &format!("/api/auth/admins/{editor_id}/permissions"),
        Some(&super_token),
        json!({ "settings": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permissions"]["settings"], true);

    // Same token, fresh matrix: the previously denied call now passes.
    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        Some(&editor_token),
        json!({ "email": "x@vitrine.local", "password": "irrelevant1", "name": "X" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = put_json(
        &app,
        "/api/auth/admins/no-such-id/permissions",
        Some(&super_token),
        json!({ "settings": true }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_permission_update_cannot_demote_super_admin() {
    let (app, state) = spawn_app().await;
    let super_token = seeded_token(&app).await;

    let admin = state
        .store
        .find_admin_by_email(SEED_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    let (status, body) = put_json(
        &app,
        &format!("/api/auth/admins/{}/permissions", admin.id),
        Some(&super_token),
        json!({
            "blogs": { "create": false, "read": false, "update": false, "delete": false },
            "settings": false
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permissions"]["blogs"]["delete"], true);
    assert_eq!(body["data"]["permissions"]["settings"], true);
}

#[tokio::test]
async fn test_offline_token_authenticates_without_store_access() {
    let (app, state) = spawn_offline_app().await;
    let jwt = seeded_token(&app).await;

    // With the database gone, real sessions fail but the recovery token
    // still synthesizes a super-admin context.
    state.store.conn.clone().close().await.unwrap();

    let (status, _) = get_json(&app, "/api/auth/me", Some(&jwt)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = get_json(&app, "/api/auth/me", Some(OFFLINE_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], OFFLINE_EMAIL);
    assert_eq!(body["data"]["role"], "super-admin");
}

#[tokio::test]
async fn test_offline_login_when_database_is_down() {
    let (app, state) = spawn_offline_app().await;

    // While the store answers, the fallback pair is just an unknown email.
    let (status, _) = login(&app, OFFLINE_EMAIL, OFFLINE_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    state.store.conn.clone().close().await.unwrap();

    let (status, body) = login(&app, OFFLINE_EMAIL, OFFLINE_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token"], OFFLINE_TOKEN);
    assert_eq!(body["data"]["admin"]["role"], "super-admin");

    // Any other credentials surface the outage instead of a fake 401.
    let (status, _) = login(&app, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_offline_paths_are_inert_when_disabled() {
    let (app, _state) = spawn_app().await;

    let (status, _) = get_json(&app, "/api/auth/me", Some(OFFLINE_TOKEN)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, OFFLINE_EMAIL, OFFLINE_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_and_expired_tokens_are_rejected() {
    let (app, _state) = spawn_app().await;

    let forged = TokenService::new("some-other-secret", 7)
        .unwrap()
        .issue("any-id")
        .unwrap();
    let (status, _) = get_json(&app, "/api/auth/me", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = TokenService::new(TEST_SECRET, -1)
        .unwrap()
        .issue("any-id")
        .unwrap();
    let (status, _) = get_json(&app, "/api/auth/me", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get_json(&app, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
