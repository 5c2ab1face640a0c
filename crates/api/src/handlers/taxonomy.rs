//! Generic handlers for the five taxonomy ranks, addressed as
//! `/taxonomy/{rank}` where `rank` is the plural table name.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myco_core::error::CoreError;
use myco_core::taxonomy::TaxonRank;
use myco_core::types::DbId;
use myco_db::models::taxon::{CreateTaxon, Taxon, UpdateTaxon};
use myco_db::repositories::TaxonRepo;

use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::ParentFilter;
use crate::response::DataResponse;
use crate::state::AppState;

fn parse_rank(segment: &str) -> AppResult<TaxonRank> {
    TaxonRank::from_route_segment(segment)
        .ok_or_else(|| AppError::NotFound(format!("Unknown taxonomy rank '{segment}'")))
}

/// GET /api/v1/taxonomy/{rank}
pub async fn list_taxa(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(rank): Path<String>,
    Query(filter): Query<ParentFilter>,
) -> AppResult<Json<DataResponse<Vec<Taxon>>>> {
    let rank = parse_rank(&rank)?;
    let data = TaxonRepo::list(&state.pool, rank, filter.parent_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/taxonomy/{rank}/{id}
pub async fn get_taxon(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((rank, id)): Path<(String, DbId)>,
) -> AppResult<Json<Taxon>> {
    let rank = parse_rank(&rank)?;
    Ok(Json(find_taxon(&state, rank, id).await?))
}

/// POST /api/v1/taxonomy/{rank}
pub async fn create_taxon(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(rank): Path<String>,
    Json(mut input): Json<CreateTaxon>,
) -> AppResult<impl IntoResponse> {
    let rank = parse_rank(&rank)?;

    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(CoreError::validation("name must not be empty").into());
    }
    if rank.requires_parent() {
        let parent_id = input.parent_id.ok_or_else(|| {
            CoreError::validation(format!("A {} requires parent_id", rank.display_name()))
        })?;
        ensure_parent_exists(&state, rank, parent_id).await?;
    } else {
        input.parent_id = None;
    }

    let taxon = TaxonRepo::create(&state.pool, rank, &input).await?;
    tracing::info!(
        rank = %rank,
        taxon_id = taxon.id,
        name = %taxon.name,
        user_id = admin.user_id,
        "Taxon created"
    );
    Ok((StatusCode::CREATED, Json(taxon)))
}

/// PUT /api/v1/taxonomy/{rank}/{id}
pub async fn update_taxon(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((rank, id)): Path<(String, DbId)>,
    Json(mut input): Json<UpdateTaxon>,
) -> AppResult<Json<Taxon>> {
    let rank = parse_rank(&rank)?;

    if let Some(name) = input.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::validation("name must not be empty").into());
        }
    }
    match input.parent_id {
        Some(parent_id) if rank.requires_parent() => {
            ensure_parent_exists(&state, rank, parent_id).await?;
        }
        _ => input.parent_id = None,
    }

    let taxon = TaxonRepo::update(&state.pool, rank, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: rank.display_name(),
            id,
        })?;
    tracing::info!(rank = %rank, taxon_id = id, user_id = admin.user_id, "Taxon updated");
    Ok(Json(taxon))
}

/// DELETE /api/v1/taxonomy/{rank}/{id}
///
/// Refused with 400 while child taxa or species still reference the row.
pub async fn delete_taxon(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((rank, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let rank = parse_rank(&rank)?;

    let deleted = TaxonRepo::delete(&state.pool, rank, id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Core(CoreError::InvalidReference(format!(
                    "{} {id} still has children and cannot be deleted",
                    rank.display_name()
                )))
            } else {
                AppError::Database(e)
            }
        })?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: rank.display_name(),
            id,
        }
        .into());
    }
    tracing::info!(rank = %rank, taxon_id = id, user_id = admin.user_id, "Taxon deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_taxon(state: &AppState, rank: TaxonRank, id: DbId) -> AppResult<Taxon> {
    TaxonRepo::find_by_id(&state.pool, rank, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: rank.display_name(),
                id,
            }
            .into()
        })
}

async fn ensure_parent_exists(state: &AppState, rank: TaxonRank, parent_id: DbId) -> AppResult<()> {
    let Some(parent_rank) = rank.parent() else {
        return Ok(());
    };
    if TaxonRepo::find_by_id(&state.pool, parent_rank, parent_id)
        .await?
        .is_none()
    {
        return Err(CoreError::InvalidReference(format!(
            "{} with id {parent_id} does not exist",
            parent_rank.display_name()
        ))
        .into());
    }
    Ok(())
}
