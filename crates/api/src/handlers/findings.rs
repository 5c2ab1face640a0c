//! Handlers for findings.
//!
//! Regular users only ever see and modify their own findings; admins see all
//! of them unless they ask for `my_findings=true`. Lookups by id report 404
//! before ownership is checked.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myco_core::authorization::{require_ownership_or_admin, scope_to_user};
use myco_core::error::CoreError;
use myco_core::finding::{validate_coordinates, validate_quantity};
use myco_core::geo::{wgs84_to_lv95, Lv95};
use myco_core::types::{DbId, Timestamp};
use myco_db::models::finding::{
    CreateFinding, FindingDetail, FindingFilter, MapPoint, UpdateFinding,
};
use myco_db::repositories::{FindingRepo, SpeciesRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_date_bound, Bound, PaginationParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct FindingListParams {
    pub species_id: Option<DbId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub my_findings: bool,
}

/// Coordinate system of map points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Wgs84,
    Lv95,
}

impl Projection {
    /// Parse `wgs84` or `lv95`, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.to_ascii_lowercase().as_str() {
            "wgs84" => Ok(Self::Wgs84),
            "lv95" => Ok(Self::Lv95),
            _ => Err(AppError::BadRequest(format!(
                "Unknown projection '{raw}'. Must be one of: wgs84, lv95"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MapParams {
    pub projection: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MapSpecies {
    pub id: DbId,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub edibility: String,
}

#[derive(Debug, Serialize)]
pub struct MapFinding {
    pub id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub found_at: Timestamp,
    pub location: Option<String>,
    pub species: MapSpecies,
    /// Present only when `projection=lv95` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lv95: Option<Lv95>,
}

impl MapFinding {
    fn from_point(point: MapPoint, projection: Projection) -> Self {
        let lv95 = match projection {
            Projection::Lv95 => Some(wgs84_to_lv95(point.latitude, point.longitude)),
            Projection::Wgs84 => None,
        };
        Self {
            id: point.id,
            latitude: point.latitude,
            longitude: point.longitude,
            found_at: point.found_at,
            location: point.location,
            species: MapSpecies {
                id: point.species_id,
                scientific_name: point.scientific_name,
                common_name: point.common_name,
                edibility: point.edibility,
            },
            lv95,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/findings
pub async fn list_findings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<FindingListParams>,
) -> AppResult<Json<PaginatedResponse<FindingDetail>>> {
    let page = pagination.page_request();
    let filter = FindingFilter {
        user_id: scope_to_user(auth.actor(), params.my_findings),
        species_id: params.species_id,
        start_date: params
            .start_date
            .as_deref()
            .map(|raw| parse_date_bound("start_date", raw, Bound::Start))
            .transpose()?,
        end_date: params
            .end_date
            .as_deref()
            .map(|raw| parse_date_bound("end_date", raw, Bound::End))
            .transpose()?,
    };

    let (rows, total) = FindingRepo::list(&state.pool, &filter, &page).await?;
    Ok(Json(PaginatedResponse::new(rows, total, &page)))
}

/// GET /api/v1/findings/map
pub async fn map_findings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MapParams>,
) -> AppResult<Json<DataResponse<Vec<MapFinding>>>> {
    let projection = params
        .projection
        .as_deref()
        .map(Projection::parse)
        .transpose()?
        .unwrap_or_default();
    let owner = scope_to_user(auth.actor(), false);
    let points = FindingRepo::map_points(&state.pool, owner).await?;
    let data = points
        .into_iter()
        .map(|p| MapFinding::from_point(p, projection))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/findings/{id}
pub async fn get_finding(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<FindingDetail>> {
    let finding = find_finding(&state, id).await?;
    require_ownership_or_admin(finding.finding.user_id, auth.actor())?;
    Ok(Json(finding))
}

/// POST /api/v1/findings
pub async fn create_finding(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateFinding>,
) -> AppResult<impl IntoResponse> {
    validate_coordinates(input.latitude, input.longitude)?;
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity)?;
    }
    ensure_species_exists(&state, input.species_id).await?;

    let created = FindingRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        finding_id = created.id,
        species_id = created.species_id,
        user_id = auth.user_id,
        "Finding recorded"
    );

    let detail = find_finding(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/v1/findings/{id}
pub async fn update_finding(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFinding>,
) -> AppResult<Json<FindingDetail>> {
    let existing = find_finding(&state, id).await?;
    require_ownership_or_admin(existing.finding.user_id, auth.actor())?;

    // Partial updates are checked against the coordinates they will produce.
    validate_coordinates(
        input.latitude.unwrap_or(existing.finding.latitude),
        input.longitude.unwrap_or(existing.finding.longitude),
    )?;
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(species_id) = input.species_id {
        ensure_species_exists(&state, species_id).await?;
    }

    FindingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Finding",
            id,
        })?;
    tracing::info!(finding_id = id, user_id = auth.user_id, "Finding updated");

    Ok(Json(find_finding(&state, id).await?))
}

/// DELETE /api/v1/findings/{id}
pub async fn delete_finding(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_finding(&state, id).await?;
    require_ownership_or_admin(existing.finding.user_id, auth.actor())?;

    FindingRepo::delete(&state.pool, id).await?;
    tracing::info!(finding_id = id, user_id = auth.user_id, "Finding deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_finding(state: &AppState, id: DbId) -> AppResult<FindingDetail> {
    FindingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Finding",
                id,
            }
            .into()
        })
}

async fn ensure_species_exists(state: &AppState, species_id: DbId) -> AppResult<()> {
    if SpeciesRepo::find_by_id(&state.pool, species_id).await?.is_none() {
        return Err(AppError::Core(CoreError::InvalidReference(format!(
            "Species with id {species_id} does not exist"
        ))));
    }
    Ok(())
}
