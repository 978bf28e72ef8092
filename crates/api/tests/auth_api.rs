//! HTTP-level tests for signup, login, refresh, logout and `/auth/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_auth, post_json, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_creates_user_role_and_signs_in(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({ "email": "Ada@Example.com", "password": "long-enough-pw", "display_name": " Ada " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["display_name"], "Ada");
    assert_eq!(json["user"]["role"], "user");

    let token = json["access_token"].as_str().unwrap();
    let me = get_auth(app, "/api/v1/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["data"]["email"], "ada@example.com");
    assert_eq!(me["data"]["role"], "user");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_duplicate_email_and_short_password(pool: PgPool) {
    common::create_user(&pool, "taken@example.com", "user").await;
    let app = common::build_test_app(pool);

    let duplicate = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({ "email": "taken@example.com", "password": "long-enough-pw" }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let short = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({ "email": "new@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(short).await["code"], "VALIDATION_ERROR");

    let bad_email = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "email": "not-an-email", "password": "long-enough-pw" }),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    common::create_user(&pool, "voter@example.com", "user").await;
    let app = common::build_test_app(pool);

    let response = login(app.clone(), "voter@example.com", "nope-nope-nope").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown = login(app, "nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn five_failed_logins_lock_the_account(pool: PgPool) {
    common::create_user(&pool, "voter@example.com", "user").await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let response = login(app.clone(), "voter@example.com", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let locked = login(app, "voter@example.com", TEST_PASSWORD).await;
    assert_eq!(locked.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    common::create_user(&pool, "voter@example.com", "user").await;
    let app = common::build_test_app(pool);

    let session = body_json(login(app.clone(), "voter@example.com", TEST_PASSWORD).await).await;
    let refresh_token = session["refresh_token"].as_str().unwrap().to_string();

    let rotated = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(rotated.status(), StatusCode::OK);
    let rotated = body_json(rotated).await;
    assert_ne!(rotated["refresh_token"], session["refresh_token"]);

    // The old token was revoked by the rotation.
    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    common::create_user(&pool, "voter@example.com", "user").await;
    let app = common::build_test_app(pool);

    let session = body_json(login(app.clone(), "voter@example.com", TEST_PASSWORD).await).await;
    let access = session["access_token"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let refresh = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": session["refresh_token"] }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_a_bearer_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let missing = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(missing).await["code"], "UNAUTHORIZED");

    let garbage = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
