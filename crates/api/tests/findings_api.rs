//! HTTP-level tests for findings: ownership, scoping, filters and the map.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn record(pool: &PgPool, token: &str, body: Value) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/findings", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

fn at(species_id: i64, found_at: &str) -> Value {
    json!({
        "species_id": species_id,
        "latitude": 46.95,
        "longitude": 7.44,
        "found_at": found_at,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults_and_returns_detail(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "hunter", "user").await;
    let species = common::create_species(&pool, "Boletus edulis").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/findings",
        json!({ "species_id": species, "latitude": 47.0, "longitude": 8.3, "notes": "Under spruce" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["user_id"], user.id);
    assert_eq!(json["quantity"], 1);
    assert_eq!(json["is_public"], false);
    assert_eq!(json["scientific_name"], "Boletus edulis");
    assert_eq!(json["username"], "hunter");
    assert!(json["found_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_input(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "hunter", "user").await;
    let species = common::create_species(&pool, "Boletus edulis").await;

    let cases = [
        (json!({ "species_id": species, "latitude": 91.0, "longitude": 8.0 }), "VALIDATION_ERROR"),
        (json!({ "species_id": species, "latitude": 47.0, "longitude": 181.0 }), "VALIDATION_ERROR"),
        (
            json!({ "species_id": species, "latitude": 47.0, "longitude": 8.0, "quantity": 0 }),
            "VALIDATION_ERROR",
        ),
        (json!({ "species_id": 9999, "latitude": 47.0, "longitude": 8.0 }), "INVALID_REFERENCE"),
    ];
    for (body, code) in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/findings", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(response).await["code"], code, "{body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_only_list_their_own_findings(pool: PgPool) {
    let (alice, alice_token) = common::create_user(&pool, "alice", "user").await;
    let (_, bob_token) = common::create_user(&pool, "bob", "user").await;
    let (_, admin_token) = common::create_user(&pool, "admin", "admin").await;
    let species = common::create_species(&pool, "Boletus edulis").await;

    record(&pool, &alice_token, at(species, "2026-06-01T10:00:00Z")).await;
    record(&pool, &alice_token, at(species, "2026-07-01T10:00:00Z")).await;
    record(&pool, &bob_token, at(species, "2026-08-01T10:00:00Z")).await;
    record(&pool, &admin_token, at(species, "2026-09-01T10:00:00Z")).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/findings", &alice_token).await).await;
    assert_eq!(json["pagination"]["total"], 2);
    let data = json["data"].as_array().unwrap();
    assert!(data.iter().all(|f| f["user_id"] == alice.id));
    // Newest first.
    assert!(data[0]["found_at"].as_str().unwrap().starts_with("2026-07-01"));

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/findings", &admin_token).await).await;
    assert_eq!(json["pagination"]["total"], 4);

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, "/api/v1/findings?my_findings=true", &admin_token).await,
    )
    .await;
    assert_eq!(json["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_species_and_dates(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "hunter", "user").await;
    let edulis = common::create_species(&pool, "Boletus edulis").await;
    let scabrum = common::create_species(&pool, "Leccinum scabrum").await;

    record(&pool, &token, at(edulis, "2026-06-01T10:00:00Z")).await;
    record(&pool, &token, at(edulis, "2026-06-30T23:30:00Z")).await;
    record(&pool, &token, at(scabrum, "2026-07-15T08:00:00Z")).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(app, &format!("/api/v1/findings?species_id={scabrum}"), &token).await,
    )
    .await;
    assert_eq!(json["pagination"]["total"], 1);

    // A bare end date includes the whole day.
    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(
            app,
            "/api/v1/findings?start_date=2026-06-01&end_date=2026-06-30",
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["pagination"]["total"], 2);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/findings?start_date=yesterday", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_finding_is_404_before_ownership(pool: PgPool) {
    let (_, alice_token) = common::create_user(&pool, "alice", "user").await;
    let (_, bob_token) = common::create_user(&pool, "bob", "user").await;
    let (_, admin_token) = common::create_user(&pool, "admin", "admin").await;
    let species = common::create_species(&pool, "Boletus edulis").await;
    let id = record(&pool, &alice_token, at(species, "2026-06-01T10:00:00Z")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/findings/9999", &bob_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/findings/{id}"), &bob_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/findings/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_owner_or_admin_may_modify(pool: PgPool) {
    let (_, alice_token) = common::create_user(&pool, "alice", "user").await;
    let (_, bob_token) = common::create_user(&pool, "bob", "user").await;
    let (_, admin_token) = common::create_user(&pool, "admin", "admin").await;
    let species = common::create_species(&pool, "Boletus edulis").await;
    let id = record(&pool, &alice_token, at(species, "2026-06-01T10:00:00Z")).await;
    let uri = format!("/api/v1/findings/{id}");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "quantity": 3 }), &bob_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &bob_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "quantity": 3 }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["quantity"], 3);
    assert_eq!(json["latitude"], 46.95);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &alice_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &alice_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_validates_merged_coordinates(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "hunter", "user").await;
    let species = common::create_species(&pool, "Boletus edulis").await;
    let id = record(&pool, &token, at(species, "2026-06-01T10:00:00Z")).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/findings/{id}"),
        json!({ "latitude": -95.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/findings/{id}"),
        json!({ "species_id": 9999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn map_points_with_optional_lv95(pool: PgPool) {
    let (_, alice_token) = common::create_user(&pool, "alice", "user").await;
    let (_, bob_token) = common::create_user(&pool, "bob", "user").await;
    let species = common::create_species(&pool, "Boletus edulis").await;
    record(&pool, &alice_token, at(species, "2026-06-01T10:00:00Z")).await;
    record(&pool, &bob_token, at(species, "2026-06-02T10:00:00Z")).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/findings/map", &alice_token).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["species"]["scientific_name"], "Boletus edulis");
    assert!(data[0].get("lv95").is_none());

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(app, "/api/v1/findings/map?projection=lv95", &alice_token).await,
    )
    .await;
    let east = json["data"][0]["lv95"]["east"].as_f64().unwrap();
    assert!((2_500_000.0..2_700_000.0).contains(&east));

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/findings/map?projection=utm", &alice_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
