#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use myco_api::auth::jwt::{generate_access_token, JwtConfig};
use myco_api::auth::password::hash_password;
use myco_api::config::ServerConfig;
use myco_api::router::build_app_router;
use myco_api::state::AppState;
use myco_core::taxonomy::TaxonRank;
use myco_db::models::species::CreateSpecies;
use myco_db::models::taxon::CreateTaxon;
use myco_db::models::user::{CreateUser, User};
use myco_db::repositories::{SpeciesRepo, TaxonRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "mushroom-hunter";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "myco-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return it with a valid access token.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Create the Basidiomycota > ... > `genus` chain (reusing existing ranks)
/// and return the genus id.
pub async fn create_genus(pool: &PgPool, genus: &str) -> i64 {
    let names = ["Basidiomycota", "Agaricomycetes", "Boletales", "Boletaceae", genus];
    let mut parent = None;
    for (rank, name) in TaxonRank::ALL.into_iter().zip(names) {
        let row = match TaxonRepo::find_by_name(pool, rank, name, parent).await.unwrap() {
            Some(row) => row,
            None => TaxonRepo::create(
                pool,
                rank,
                &CreateTaxon {
                    name: name.to_string(),
                    common_name: None,
                    description: None,
                    parent_id: parent,
                },
            )
            .await
            .unwrap(),
        };
        parent = Some(row.id);
    }
    parent.unwrap()
}

pub async fn create_species(pool: &PgPool, scientific_name: &str) -> i64 {
    let genus = scientific_name.split(' ').next().unwrap_or("Boletus");
    let genus_id = create_genus(pool, genus).await;
    SpeciesRepo::create(
        pool,
        &CreateSpecies {
            scientific_name: scientific_name.to_string(),
            genus_id,
            ..Default::default()
        },
    )
    .await
    .expect("species creation should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
