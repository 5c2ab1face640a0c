//! Findings: a user's record of a species observed at a place and time.

use myco_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `findings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Finding {
    pub id: DbId,
    pub user_id: DbId,
    pub species_id: DbId,
    pub found_at: Timestamp,
    pub latitude: f64,
    pub longitude: f64,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub quantity: i32,
    pub weather: Option<String>,
    pub temperature: Option<f64>,
    pub photo_url: Option<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A finding with its species, genus and owner resolved for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FindingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub finding: Finding,
    pub scientific_name: String,
    pub species_common_name: Option<String>,
    pub species_common_name_de: Option<String>,
    pub edibility: String,
    pub genus_name: String,
    pub username: String,
}

/// Owner comes from the authenticated caller, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFinding {
    pub species_id: DbId,
    /// Defaults to now.
    pub found_at: Option<Timestamp>,
    pub latitude: f64,
    pub longitude: f64,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub quantity: Option<i32>,
    pub weather: Option<String>,
    pub temperature: Option<f64>,
    pub photo_url: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFinding {
    pub species_id: Option<DbId>,
    pub found_at: Option<Timestamp>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub quantity: Option<i32>,
    pub weather: Option<String>,
    pub temperature: Option<f64>,
    pub photo_url: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FindingFilter {
    /// Restrict to one owner. `None` lists every user's findings.
    pub user_id: Option<DbId>,
    pub species_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// Minimal projection used to draw findings on a map.
#[derive(Debug, Clone, FromRow)]
pub struct MapPoint {
    pub id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub found_at: Timestamp,
    pub location: Option<String>,
    pub species_id: DbId,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub edibility: String,
}

/// A finding whose species row no longer exists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrphanedFinding {
    pub id: DbId,
    pub user_id: DbId,
    pub species_id: DbId,
    pub found_at: Timestamp,
    pub username: Option<String>,
}
