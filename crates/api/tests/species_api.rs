//! HTTP-level tests for the species catalogue.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_paginates_with_lineage(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "reader", "user").await;
    for name in ["Boletus edulis", "Boletus pinophilus", "Leccinum scabrum"] {
        common::create_species(&pool, name).await;
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/species?page=2&limit=2", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["scientific_name"], "Leccinum scabrum");
    assert_eq!(data[0]["genus_name"], "Leccinum");
    assert_eq!(data[0]["family_name"], "Boletaceae");
    assert_eq!(data[0]["division_name"], "Basidiomycota");
    assert_eq!(json["pagination"]["total"], 3);
    assert_eq!(json["pagination"]["total_pages"], 2);
    assert_eq!(json["pagination"]["has_next"], false);
    assert_eq!(json["pagination"]["has_prev"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_search_and_genus(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "reader", "user").await;
    common::create_species(&pool, "Boletus edulis").await;
    let leccinum = common::create_species(&pool, "Leccinum scabrum").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/species?search=EDUL", &token).await).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["scientific_name"], "Boletus edulis");

    let genus_id = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/species/{leccinum}"),
            &token,
        )
        .await,
    )
    .await["genus_id"]
        .as_i64()
        .unwrap();
    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/species?genus_id={genus_id}"), &token).await,
    )
    .await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["id"], leccinum);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_rejects_invalid_filters(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "reader", "user").await;

    for query in ["edibility=tasty", "occurrence=everywhere", "season=13"] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &format!("/api/v1/species?{query}"), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_species_is_404(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "reader", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/species/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Species with id 9999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_admin(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "plain", "user").await;
    let genus_id = common::create_genus(&pool, "Boletus").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/species",
        json!({ "scientific_name": "Boletus edulis", "genus_id": genus_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_species_with_defaults(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "curator", "admin").await;
    let genus_id = common::create_genus(&pool, "Boletus").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/species",
        json!({
            "scientific_name": "  Boletus edulis ",
            "genus_id": genus_id,
            "common_name_de": "Steinpilz",
            "season_start": 7,
            "season_end": 10
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["scientific_name"], "Boletus edulis");
    assert_eq!(json["edibility"], "unknown");
    assert_eq!(json["occurrence"], "occasional");
    assert_eq!(json["genus_name"], "Boletus");
    assert_eq!(json["common_name_de"], "Steinpilz");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_bad_input(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "curator", "admin").await;
    let genus_id = common::create_genus(&pool, "Boletus").await;

    let cases = [
        (json!({ "scientific_name": "X y", "genus_id": 9999 }), "INVALID_REFERENCE"),
        (json!({ "scientific_name": " ", "genus_id": genus_id }), "VALIDATION_ERROR"),
        (
            json!({ "scientific_name": "X y", "genus_id": genus_id, "edibility": "yummy" }),
            "VALIDATION_ERROR",
        ),
        (
            json!({ "scientific_name": "X y", "genus_id": genus_id, "season_end": 0 }),
            "VALIDATION_ERROR",
        ),
    ];
    for (body, code) in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/species", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(response).await["code"], code, "{body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_scientific_name_conflicts(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "curator", "admin").await;
    common::create_species(&pool, "Boletus edulis").await;
    let genus_id = common::create_genus(&pool, "Boletus").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/species",
        json!({ "scientific_name": "Boletus edulis", "genus_id": genus_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_only_sent_fields(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "curator", "admin").await;
    let id = common::create_species(&pool, "Boletus edulis").await;
    let app = common::build_test_app(pool.clone());

    let response = put_json_auth(
        app,
        &format!("/api/v1/species/{id}"),
        json!({ "edibility": "edible", "common_name": "Porcini" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["edibility"], "edible");
    assert_eq!(json["common_name"], "Porcini");
    assert_eq!(json["scientific_name"], "Boletus edulis");

    let app = common::build_test_app(pool);
    let response = put_json_auth(app, "/api/v1/species/9999", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_refused_while_findings_exist(pool: PgPool) {
    let (_, admin_token) = common::create_user(&pool, "curator", "admin").await;
    let (_, user_token) = common::create_user(&pool, "hunter", "user").await;
    let id = common::create_species(&pool, "Boletus edulis").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/findings",
        json!({ "species_id": id, "latitude": 46.9, "longitude": 7.4 }),
        &user_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let finding_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/species/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");

    let app = common::build_test_app(pool.clone());
    let response =
        delete_auth(app, &format!("/api/v1/findings/{finding_id}"), &user_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/species/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/species/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
