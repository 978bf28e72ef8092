//! Admin-only mutations must be refused before anything is written.

mod common;

use axum::http::StatusCode;
use common::{body_json, count_rows, delete_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_create_any_entity(pool: PgPool) {
    let (_user, token) = common::member(&pool, "voter@example.com").await;
    common::seed_category(&pool, "Best Film").await;
    let genre_id: i64 = sqlx::query_scalar(
        "INSERT INTO artistic_genres (name, slug) VALUES ('Music', 'music') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let app = common::build_test_app(pool.clone());

    let attempts = [
        ("/api/v1/categories", json!({ "name": "Best Song" }), "categories"),
        (
            "/api/v1/nominees",
            json!({ "name": "Film A", "category": "Best Film" }),
            "nominees",
        ),
        (
            "/api/v1/events",
            json!({ "title": "Gala", "event_date": "2026-12-01T19:00:00Z" }),
            "events",
        ),
        ("/api/v1/academy/genres", json!({ "name": "Dance" }), "artistic_genres"),
        (
            "/api/v1/academy/members",
            json!({ "name": "Jo", "genre_id": genre_id }),
            "academy_members",
        ),
    ];

    for (uri, body, table) in attempts {
        let before = count_rows(&pool, table).await;
        let response = post_json_auth(app.clone(), uri, body, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "POST {uri}");
        assert_eq!(body_json(response).await["code"], "FORBIDDEN");
        assert_eq!(count_rows(&pool, table).await, before, "{table} must be untouched");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_update_or_delete(pool: PgPool) {
    let (_user, token) = common::member(&pool, "voter@example.com").await;
    let category_id = common::seed_category(&pool, "Best Film").await;
    let nominee_id = common::seed_nominee(&pool, "Film A", "Best Film").await;
    let app = common::build_test_app(pool.clone());

    let rename = put_json_auth(
        app.clone(),
        &format!("/api/v1/categories/{category_id}"),
        json!({ "name": "Renamed" }),
        &token,
    )
    .await;
    assert_eq!(rename.status(), StatusCode::FORBIDDEN);

    let delete = delete_auth(app.clone(), &format!("/api/v1/nominees/{nominee_id}"), &token).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let name: String = sqlx::query_scalar("SELECT name FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(name, "Best Film");
    assert_eq!(count_rows(&pool, "nominees").await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn demoted_admin_token_is_refused(pool: PgPool) {
    let (admin, token) = common::admin(&pool).await;
    // The token still says "admin"; the stored role is what counts.
    sqlx::query("UPDATE user_profiles SET role = 'user' WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(app, "/api/v1/categories", json!({ "name": "Best Song" }), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(count_rows(&pool, "categories").await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_admin_is_refused(pool: PgPool) {
    let (admin, token) = common::admin(&pool).await;
    sqlx::query("UPDATE user_profiles SET is_active = false WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(app, "/api/v1/categories", json!({ "name": "Best Song" }), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn anonymous_mutation_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = common::post_json(app, "/api/v1/categories", json!({ "name": "Best Song" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count_rows(&pool, "categories").await, 0);
}
