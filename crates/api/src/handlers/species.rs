//! Handlers for the species catalogue. Reads need any authenticated user,
//! writes need an admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myco_core::error::CoreError;
use myco_core::species::{validate_edibility, validate_month, validate_occurrence, validate_season};
use myco_core::taxonomy::TaxonRank;
use myco_core::types::DbId;
use myco_db::models::species::{
    CreateSpecies, SpeciesFilter, SpeciesWithLineage, UpdateSpecies,
};
use myco_db::repositories::{SpeciesRepo, TaxonRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::PaginatedResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SpeciesListParams {
    pub search: Option<String>,
    pub edibility: Option<String>,
    pub occurrence: Option<String>,
    pub genus_id: Option<DbId>,
    pub family_id: Option<DbId>,
    pub order_id: Option<DbId>,
    pub class_id: Option<DbId>,
    pub division_id: Option<DbId>,
    pub season: Option<i32>,
}

impl SpeciesListParams {
    /// Validate enum and month values and drop blank search terms.
    fn into_filter(self) -> Result<SpeciesFilter, CoreError> {
        if let Some(e) = &self.edibility {
            validate_edibility(e)?;
        }
        if let Some(o) = &self.occurrence {
            validate_occurrence(o)?;
        }
        if let Some(month) = self.season {
            validate_month(month)?;
        }
        Ok(SpeciesFilter {
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            edibility: self.edibility,
            occurrence: self.occurrence,
            genus_id: self.genus_id,
            family_id: self.family_id,
            order_id: self.order_id,
            class_id: self.class_id,
            division_id: self.division_id,
            season: self.season,
        })
    }
}

/// GET /api/v1/species
pub async fn list_species(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<SpeciesListParams>,
) -> AppResult<Json<PaginatedResponse<SpeciesWithLineage>>> {
    let page = pagination.page_request();
    let filter = params.into_filter()?;
    let (rows, total) = SpeciesRepo::list(&state.pool, &filter, &page).await?;
    Ok(Json(PaginatedResponse::new(rows, total, &page)))
}

/// GET /api/v1/species/{id}
pub async fn get_species(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SpeciesWithLineage>> {
    Ok(Json(find_species(&state, id).await?))
}

/// POST /api/v1/species
pub async fn create_species(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateSpecies>,
) -> AppResult<impl IntoResponse> {
    input.scientific_name = input.scientific_name.trim().to_string();
    if input.scientific_name.is_empty() {
        return Err(CoreError::validation("scientific_name must not be empty").into());
    }
    validate_attributes(
        input.edibility.as_deref(),
        input.occurrence.as_deref(),
        input.season_start,
        input.season_end,
    )?;
    ensure_genus_exists(&state, input.genus_id).await?;

    let created = SpeciesRepo::create(&state.pool, &input).await?;
    tracing::info!(
        species_id = created.id,
        scientific_name = %created.scientific_name,
        user_id = admin.user_id,
        "Species created"
    );

    let species = find_species(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(species)))
}

/// PUT /api/v1/species/{id}
pub async fn update_species(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateSpecies>,
) -> AppResult<Json<SpeciesWithLineage>> {
    if let Some(name) = input.scientific_name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::validation("scientific_name must not be empty").into());
        }
    }
    validate_attributes(
        input.edibility.as_deref(),
        input.occurrence.as_deref(),
        input.season_start,
        input.season_end,
    )?;
    if let Some(genus_id) = input.genus_id {
        ensure_genus_exists(&state, genus_id).await?;
    }

    SpeciesRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Species",
            id,
        })?;
    tracing::info!(species_id = id, user_id = admin.user_id, "Species updated");

    Ok(Json(find_species(&state, id).await?))
}

/// DELETE /api/v1/species/{id}
///
/// Species still referenced by findings cannot be deleted (400).
pub async fn delete_species(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SpeciesRepo::delete(&state.pool, id).await.map_err(|e| {
        if crate::error::is_foreign_key_violation(&e) {
            AppError::Core(CoreError::InvalidReference(
                "Species still has findings and cannot be deleted".into(),
            ))
        } else {
            AppError::Database(e)
        }
    })?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Species",
            id,
        }
        .into());
    }
    tracing::info!(species_id = id, user_id = admin.user_id, "Species deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_species(state: &AppState, id: DbId) -> AppResult<SpeciesWithLineage> {
    SpeciesRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Species",
                id,
            }
            .into()
        })
}

fn validate_attributes(
    edibility: Option<&str>,
    occurrence: Option<&str>,
    season_start: Option<i32>,
    season_end: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(e) = edibility {
        validate_edibility(e)?;
    }
    if let Some(o) = occurrence {
        validate_occurrence(o)?;
    }
    validate_season(season_start, season_end)
}

async fn ensure_genus_exists(state: &AppState, genus_id: DbId) -> AppResult<()> {
    if TaxonRepo::find_by_id(&state.pool, TaxonRank::Genus, genus_id)
        .await?
        .is_none()
    {
        return Err(CoreError::InvalidReference(format!(
            "Genus with id {genus_id} does not exist"
        ))
        .into());
    }
    Ok(())
}
