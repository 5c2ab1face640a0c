//! `AppError` to HTTP response mapping, checked without a server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use myco_api::error::AppError;
use myco_core::error::CoreError;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_names_entity_and_id() {
    let (status, json) = render(AppError::Core(CoreError::NotFound {
        entity: "Species",
        id: 42,
    }))
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Species with id 42 not found");
}

#[tokio::test]
async fn invalid_reference_is_a_bad_request() {
    let (status, json) = render(AppError::Core(CoreError::InvalidReference(
        "Genus with id 9 does not exist".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn validation_maps_to_400() {
    let (status, json) =
        render(CoreError::validation("Month must be between 1 and 12").into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn auth_errors_map_to_401_and_403() {
    let (status, json) = render(CoreError::Unauthorized("Invalid credentials".into()).into()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid credentials");

    let (status, json) = render(CoreError::Forbidden("Access denied".into()).into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) = render(AppError::InternalError("password=hunter2".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, _) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
