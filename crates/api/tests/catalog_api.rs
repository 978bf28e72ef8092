//! HTTP-level tests for categories, nominees, events and the academy.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_category_generates_slug(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "  Best Música Video ", "description": "" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Best Música Video");
    assert_eq!(json["data"]["slug"], "best-musica-video");
    assert!(json["data"]["description"].is_null());

    let by_slug = get(app, "/api/v1/categories/slug/best-musica-video").await;
    assert_eq!(by_slug.status(), StatusCode::OK);
    assert_eq!(body_json(by_slug).await["data"]["name"], "Best Música Video");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn category_form_rejects_unknown_fields_and_missing_name(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool.clone());

    let unknown = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "Best Film", "colour": "red" }),
        &token,
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let missing = post_json_auth(app, "/api/v1/categories", json!({ "description": "x" }), &token).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["code"], "VALIDATION_ERROR");
    assert_eq!(common::count_rows(&pool, "categories").await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_category_is_conflict(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    common::seed_category(&pool, "Best Film").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/categories", json!({ "name": "Best Film" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_category_in_use_reports_nominee_count(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let category = common::seed_category(&pool, "Best Film").await;
    common::seed_nominee(&pool, "Film A", "Best Film").await;
    common::seed_nominee(&pool, "Film B", "Best Film").await;
    let app = common::build_test_app(pool.clone());

    let response = delete_auth(app, &format!("/api/v1/categories/{category}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CATEGORY_IN_USE");
    assert!(json["error"].as_str().unwrap().contains("2 nominee(s)"));
    assert_eq!(common::count_rows(&pool, "categories").await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_unused_category_succeeds(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let category = common::seed_category(&pool, "Best Film").await;
    let app = common::build_test_app(pool.clone());

    let response = delete_auth(app.clone(), &format!("/api/v1/categories/{category}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = delete_auth(app, &format!("/api/v1/categories/{category}"), &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn category_list_includes_nominee_counts(pool: PgPool) {
    common::seed_category(&pool, "Best Film").await;
    common::seed_category(&pool, "Best Song").await;
    common::seed_nominee(&pool, "Film A", "Best Film").await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/categories").await).await;
    let categories = json["data"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    let film = categories.iter().find(|c| c["name"] == "Best Film").unwrap();
    assert_eq!(film["nominee_count"], 1);
}

// ---------------------------------------------------------------------------
// Nominees
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn nominee_requires_existing_category(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    common::seed_category(&pool, "Best Film").await;
    let app = common::build_test_app(pool.clone());

    let missing = post_json_auth(
        app.clone(),
        "/api/v1/nominees",
        json!({ "name": "Film A", "category": "Best Dance" }),
        &token,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let created = post_json_auth(
        app,
        "/api/v1/nominees",
        json!({ "name": "Film A", "category": "Best Film", "tags": "drama, indie" }),
        &token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let json = body_json(created).await;
    assert_eq!(json["data"]["tags"], json!(["drama", "indie"]));
    assert_eq!(json["data"]["votes_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn nominee_list_filters_by_category_and_tag(pool: PgPool) {
    common::seed_nominee(&pool, "Film A", "Best Film").await;
    common::seed_nominee(&pool, "Song B", "Best Song").await;
    sqlx::query("UPDATE nominees SET tags = ARRAY['indie'] WHERE name = 'Song B'")
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let films = body_json(get(app.clone(), "/api/v1/nominees?category=Best%20Film").await).await;
    assert_eq!(films["data"].as_array().unwrap().len(), 1);
    assert_eq!(films["data"][0]["name"], "Film A");

    let indie = body_json(get(app, "/api/v1/nominees?tag=indie").await).await;
    assert_eq!(indie["data"].as_array().unwrap().len(), 1);
    assert_eq!(indie["data"][0]["name"], "Song B");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_and_delete_nominee(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    common::seed_category(&pool, "Best Film").await;
    let nominee = common::seed_nominee(&pool, "Film A", "Best Film").await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/nominees/{nominee}");

    let updated = put_json_auth(app.clone(), &uri, json!({ "description": "A film." }), &token).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let json = body_json(updated).await;
    assert_eq!(json["data"]["description"], "A film.");
    assert_eq!(json["data"]["name"], "Film A");

    let moved = put_json_auth(app.clone(), &uri, json!({ "category": "Best Dance" }), &token).await;
    assert_eq!(moved.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(get(app.clone(), &uri).await).await["data"]["category"],
        "Best Film"
    );

    let deleted = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clearing_optional_nominee_fields(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    common::seed_category(&pool, "Best Film").await;
    let nominee = common::seed_nominee(&pool, "Film A", "Best Film").await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/nominees/{nominee}");

    let seeded = put_json_auth(
        app.clone(),
        &uri,
        json!({ "description": "A film.", "image_url": "https://img.example/a.png" }),
        &token,
    )
    .await;
    assert_eq!(seeded.status(), StatusCode::OK);

    // An emptied description is stored as NULL; the untouched image stays.
    let cleared = put_json_auth(app.clone(), &uri, json!({ "description": "" }), &token).await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let json = body_json(cleared).await;
    assert!(json["data"]["description"].is_null(), "{json}");
    assert_eq!(json["data"]["image_url"], "https://img.example/a.png");

    let cleared = put_json_auth(app.clone(), &uri, json!({ "image_url": null }), &token).await;
    assert_eq!(cleared.status(), StatusCode::OK);

    let stored = body_json(get(app, &uri).await).await;
    assert!(stored["data"]["description"].is_null());
    assert!(stored["data"]["image_url"].is_null());
    assert_eq!(stored["data"]["name"], "Film A");
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn featured_and_upcoming_event_filters(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    for (title, date, featured) in [
        ("Past Gala", "2020-01-01T19:00:00Z", true),
        ("Future Gala", "2099-01-01T19:00:00Z", true),
        ("Future Mixer", "2099-02-01T19:00:00Z", false),
    ] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/events",
            json!({ "title": title, "event_date": date, "is_featured": featured }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED, "{title}");
    }

    let featured = body_json(get(app.clone(), "/api/v1/events?featured=true").await).await;
    assert_eq!(featured["data"].as_array().unwrap().len(), 2);

    let upcoming = body_json(get(app.clone(), "/api/v1/events?upcoming=true").await).await;
    let titles: Vec<&str> = upcoming["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Future Gala", "Future Mixer"]);

    let both = body_json(get(app, "/api/v1/events?featured=true&upcoming=true").await).await;
    assert_eq!(both["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clearing_optional_event_fields(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/v1/events",
        json!({
            "title": "Gala",
            "event_date": "2099-01-01T19:00:00Z",
            "location": "Main Hall",
            "capacity": 300,
        }),
        &token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let updated = put_json_auth(
        app,
        &format!("/api/v1/events/{id}"),
        json!({ "location": "  ", "capacity": null }),
        &token,
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let json = body_json(updated).await;
    assert!(json["data"]["location"].is_null(), "{json}");
    assert!(json["data"]["capacity"].is_null(), "{json}");
    assert_eq!(json["data"]["title"], "Gala");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn event_form_rejects_bad_values(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool.clone());

    for body in [
        json!({ "title": "Gala", "event_date": "next friday" }),
        json!({ "title": "Gala", "event_date": "2099-01-01T19:00:00Z", "capacity": -1 }),
        json!({ "title": "Gala", "event_date": "2099-01-01T19:00:00Z", "image_url": "ftp://x" }),
    ] {
        let response = post_json_auth(app.clone(), "/api/v1/events", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    assert_eq!(common::count_rows(&pool, "events").await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn events_listing_repairs_dropped_column(pool: PgPool) {
    sqlx::query("ALTER TABLE events DROP COLUMN is_featured")
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/events").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Academy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn genre_with_members_cannot_be_deleted(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool.clone());

    let genre = body_json(
        post_json_auth(app.clone(), "/api/v1/academy/genres", json!({ "name": "Music" }), &token).await,
    )
    .await;
    let genre_id = genre["data"]["id"].as_i64().unwrap();
    assert_eq!(genre["data"]["slug"], "music");

    let member = post_json_auth(
        app.clone(),
        "/api/v1/academy/members",
        json!({
            "name": "Jo",
            "genre_id": genre_id,
            "social_media": { "instagram": "@jo" },
            "achievements": ["Gold Disc"],
        }),
        &token,
    )
    .await;
    assert_eq!(member.status(), StatusCode::CREATED);

    let response = delete_auth(app.clone(), &format!("/api/v1/academy/genres/{genre_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(common::count_rows(&pool, "artistic_genres").await, 1);

    let listing = body_json(get(app, &format!("/api/v1/academy/members?genre_id={genre_id}")).await).await;
    assert_eq!(listing["data"][0]["genre_name"], "Music");
    assert_eq!(listing["data"][0]["social_media"]["instagram"], "@jo");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn member_with_unknown_genre_is_rejected(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/academy/members",
        json!({ "name": "Jo", "genre_id": 4242 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::count_rows(&pool, "academy_members").await, 0);
}
