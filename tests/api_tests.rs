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

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = Some("integration-test-secret".to_string());

    let store = vitrine::db::Store::new(&config.general.database_path)
        .await
        .expect("Failed to open store");
    let state =
        vitrine::api::create_app_state(config, store).expect("Failed to create app state");
    (vitrine::api::router(state.clone()), state)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = if let Some(body) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": SEED_ADMIN_EMAIL, "password": SEED_ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

fn blog_payload(slug: &str) -> Value {
    json!({
        "title": format!("Post {slug}"),
        "slug": slug,
        "excerpt": "A short summary",
        "content": "## Heading\nBody text that says something useful.",
        "author": { "name": "Ana" },
        "category": "Technology",
        "tags": ["rust", "backend"],
        "cover_image": "/images/cover.png",
        "status": "published"
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = spawn_app().await;
    let (status, body) = request(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_blog_crud_round_trip() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    // Unauthenticated mutation is refused outright.
    let (status, _) = request(&app, "POST", "/api/blogs", None, Some(blog_payload("x"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(
        &app,
        "POST",
        "/api/blogs",
        Some(&token),
        Some(blog_payload("first-post")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["views"], 0);

    // Duplicate slug conflicts.
    let (status, _) = request(
        &app,
        "POST",
        "/api/blogs",
        Some(&token),
        Some(blog_payload("first-post")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Public list sees it.
    let (status, body) = request(&app, "GET", "/api/blogs?status=published", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["slug"], "first-post");

    // Public detail increments views.
    let (status, body) = request(&app, "GET", "/api/blogs/first-post", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 1);
    let (_, body) = request(&app, "GET", "/api/blogs/first-post", None, None).await;
    assert_eq!(body["data"]["views"], 2);

    // Full update.
    let mut updated = blog_payload("first-post");
    updated["title"] = json!("Rewritten title");
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/blogs/{id}"),
        Some(&token),
        Some(updated),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Rewritten title");
    // Counters survive a full update.
    assert_eq!(body["data"]["views"], 2);

    // Delete, then 404.
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/blogs/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", "/api/blogs/first-post", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/blogs/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_validation_and_pagination() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    let mut bad = blog_payload("bad-category");
    bad["category"] = json!("Gardening");
    let (status, _) = request(&app, "POST", "/api/blogs", Some(&token), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for i in 0..5 {
        let (status, _) = request(
            &app,
            "POST",
            "/api/blogs",
            Some(&token),
            Some(blog_payload(&format!("post-{i}"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = request(&app, "GET", "/api/blogs?page=2&limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["pages"], 3);
}

#[tokio::test]
async fn test_editor_without_delete_permission_gets_403() {
    let (app, _state) = spawn_app().await;
    let super_token = admin_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/blogs",
        Some(&super_token),
        Some(blog_payload("protected-post")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    // Default editor matrix: read-only on every resource.
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        Some(&super_token),
        Some(json!({
            "email": "editor@vitrine.local",
            "password": "editor-password",
            "name": "Ed Itor",
            "role": "editor"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "editor@vitrine.local", "password": "editor-password" })),
    )
    .await;
    let editor_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/blogs/{id}"),
        Some(&editor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        "/api/blogs",
        Some(&editor_token),
        Some(blog_payload("editor-post")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The post is still there.
    let (status, _) = request(&app, "GET", "/api/blogs/protected-post", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_crud_round_trip() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    let payload = json!({
        "name": "GearMaster",
        "slug": "gearmaster",
        "tagline": "Garage management, solved",
        "description": "Inventory, invoicing and job tracking for auto shops.",
        "category": "SaaS",
        "features": [{ "title": "Inventory", "description": "Track parts" }],
        "technologies": ["rust", "sqlite"],
        "status": "launched"
    });

    let (status, body) = request(&app, "POST", "/api/products", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["pricing"]["model"], "free");

    let (status, body) = request(&app, "GET", "/api/products/gearmaster", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "GearMaster");

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/products/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", "/api/products/gearmaster", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_career_crud_round_trip() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    let payload = json!({
        "title": "Backend Engineer",
        "slug": "backend-engineer",
        "department": "Engineering",
        "location": "Remote",
        "employment_type": "full-time",
        "level": "senior",
        "description": "Own the server side of our products.",
        "responsibilities": ["Design APIs"],
        "requirements": ["5+ years with networked services"],
        "salary": { "min": 90000, "max": 120000, "currency": "EUR" }
    });

    let (status, body) = request(&app, "POST", "/api/careers", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "open");
    assert_eq!(body["data"]["openings"], 1);

    let (status, body) = request(
        &app,
        "GET",
        "/api/careers?department=Engineering",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);

    // Applying bumps the posting's applicant counter through the tracker.
    let (status, _) = request(
        &app,
        "POST",
        "/api/analytics/track",
        None,
        Some(json!({ "event": "career_application", "data": { "career_id": id } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(&app, "GET", "/api/careers/backend-engineer", None, None).await;
    assert_eq!(body["data"]["applicants"], 1);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/careers/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", "/api/careers/backend-engineer", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analytics_track_feeds_dashboard_and_trends() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    for _ in 0..3 {
        let (status, _) = request(
            &app,
            "POST",
            "/api/analytics/track",
            None,
            Some(json!({ "event": "page_view", "page": "home" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = request(
        &app,
        "POST",
        "/api/analytics/track",
        None,
        Some(json!({ "event": "blog_view", "data": { "blog_id": 7 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "POST",
        "/api/analytics/track",
        None,
        Some(json!({ "event": "contact_form" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown events are acknowledged and dropped.
    let (status, _) = request(
        &app,
        "POST",
        "/api/analytics/track",
        None,
        Some(json!({ "event": "made_up" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The dashboard is gated.
    let (status, _) = request(&app, "GET", "/api/analytics/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(&app, "GET", "/api/analytics/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totals"]["page_views"], 3);
    assert_eq!(body["data"]["totals"]["contact_forms"], 1);
    assert_eq!(body["data"]["timeline"][0]["page_views"]["home"], 3);
    assert_eq!(body["data"]["timeline"][0]["blog_views"][0]["views"], 1);

    let (status, body) = request(
        &app,
        "GET",
        "/api/analytics/trends?days=7",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let trends = body["data"].as_array().unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0]["page_views"], 3);
    assert_eq!(trends[0]["engagement"], 1);
}

#[tokio::test]
async fn test_assistant_chat_is_public_and_counted() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/assistant/chat",
        None,
        Some(json!({ "message": "How do I contact you?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["reply"].as_str().unwrap().len() > 0);
    assert_eq!(body["data"]["navigate_to"], "/contact");

    let (status, _) = request(
        &app,
        "POST",
        "/api/assistant/chat",
        None,
        Some(json!({ "message": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request(&app, "GET", "/api/analytics/dashboard", Some(&token), None).await;
    assert_eq!(body["data"]["totals"]["ai_interactions"], 1);
}

#[tokio::test]
async fn test_ai_helpers_require_authentication() {
    let (app, _state) = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/blogs/ai/generate",
        None,
        Some(json!({ "topic": "Edge computing" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(
        &app,
        "POST",
        "/api/blogs/ai/generate",
        Some(&token),
        Some(json!({ "topic": "Edge computing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]["content"]
            .as_str()
            .unwrap()
            .contains("Edge computing")
    );

    let (status, body) = request(
        &app,
        "POST",
        "/api/blogs/ai/seo-analysis",
        Some(&token),
        Some(json!({ "title": "Short", "content": "tiny" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["score"], 50);

    let (status, body) = request(
        &app,
        "POST",
        "/api/careers/ai/generate",
        Some(&token),
        Some(json!({ "title": "Engineer", "department": "Engineering", "level": "senior" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]["requirements"][0]
            .as_str()
            .unwrap()
            .starts_with("5+")
    );
}
