#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use laurels_api::auth::jwt::{generate_access_token, JwtConfig};
use laurels_api::auth::password::hash_password;
use laurels_api::config::ServerConfig;
use laurels_api::router::build_app_router;
use laurels_api::state::AppState;
use laurels_core::content::ContentCache;
use laurels_core::roles::{ROLE_ADMIN, ROLE_USER};
use laurels_db::content_source::PgContentSource;
use laurels_db::models::user::{CreateUserProfile, UserProfile};
use laurels_db::repositories::UserRepo;
use laurels_events::EventBus;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        content_cache_ttl_secs: 30,
        content_fetch_timeout_secs: 5,
        dashboard_section_timeout_secs: 5,
        bootstrap_admin: None,
    }
}

/// State wired the same way `main` wires it, over the test database.
pub fn test_state(pool: PgPool) -> AppState {
    let config = test_config();
    let content = Arc::new(ContentCache::new(
        Arc::new(PgContentSource::new(pool.clone())),
        config.cache_config(),
    ));
    AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
        content,
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config()).expect("test config is valid")
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> UserProfile {
    let input = CreateUserProfile {
        email: email.to_string(),
        display_name: Some(email.split('@').next().unwrap_or(email).to_string()),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &UserProfile) -> String {
    generate_access_token(user.id, &user.email, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// An admin profile and its access token.
pub async fn admin(pool: &PgPool) -> (UserProfile, String) {
    let user = create_user(pool, "admin@laurels.test", ROLE_ADMIN).await;
    let token = token_for(&user);
    (user, token)
}

/// A regular profile and its access token.
pub async fn member(pool: &PgPool, email: &str) -> (UserProfile, String) {
    let user = create_user(pool, email, ROLE_USER).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_category(pool: &PgPool, name: &str) -> i64 {
    let slug = name.to_lowercase().replace(' ', "-");
    sqlx::query_scalar("INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
        .expect("category insert should succeed")
}

pub async fn seed_nominee(pool: &PgPool, name: &str, category: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO nominees (name, category) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(category)
        .fetch_one(pool)
        .await
        .expect("nominee insert should succeed")
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count should succeed")
}
