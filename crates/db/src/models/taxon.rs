//! Taxonomy rows. All five rank tables share one shape, so a single model
//! covers them; the rank-specific parent column is exposed as `parent_id`.

use myco_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Taxon {
    pub id: DbId,
    pub name: String,
    pub common_name: Option<String>,
    pub description: Option<String>,
    /// Always `None` for divisions.
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaxon {
    pub name: String,
    pub common_name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaxon {
    pub name: Option<String>,
    pub common_name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}
