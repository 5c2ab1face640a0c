//! Species catalogue model and DTOs.

use myco_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `species` table.
///
/// `edibility` and `occurrence` hold the snake_case strings of
/// [`myco_core::species::Edibility`] and [`myco_core::species::Occurrence`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Species {
    pub id: DbId,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub common_name_de: Option<String>,
    pub common_name_fr: Option<String>,
    pub common_name_it: Option<String>,
    pub synonyms: Option<String>,
    pub description: Option<String>,
    pub habitat: Option<String>,
    pub edibility: String,
    pub toxicity: Option<String>,
    pub season_start: Option<i32>,
    pub season_end: Option<i32>,
    pub cap_shape: Option<String>,
    pub cap_color: Option<String>,
    pub gill_attachment: Option<String>,
    pub spore_print_color: Option<String>,
    pub occurrence: String,
    pub image_url: Option<String>,
    pub genus_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A species joined with every rank above it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SpeciesWithLineage {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub species: Species,
    pub genus_name: String,
    pub genus_common_name: Option<String>,
    pub family_id: DbId,
    pub family_name: String,
    pub order_id: DbId,
    pub order_name: String,
    pub class_id: DbId,
    pub class_name: String,
    pub division_id: DbId,
    pub division_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSpecies {
    pub scientific_name: String,
    pub genus_id: DbId,
    pub common_name: Option<String>,
    pub common_name_de: Option<String>,
    pub common_name_fr: Option<String>,
    pub common_name_it: Option<String>,
    pub synonyms: Option<String>,
    pub description: Option<String>,
    pub habitat: Option<String>,
    /// Defaults to `unknown` when absent.
    pub edibility: Option<String>,
    pub toxicity: Option<String>,
    pub season_start: Option<i32>,
    pub season_end: Option<i32>,
    pub cap_shape: Option<String>,
    pub cap_color: Option<String>,
    pub gill_attachment: Option<String>,
    pub spore_print_color: Option<String>,
    /// Defaults to `occasional` when absent.
    pub occurrence: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSpecies {
    pub scientific_name: Option<String>,
    pub genus_id: Option<DbId>,
    pub common_name: Option<String>,
    pub common_name_de: Option<String>,
    pub common_name_fr: Option<String>,
    pub common_name_it: Option<String>,
    pub synonyms: Option<String>,
    pub description: Option<String>,
    pub habitat: Option<String>,
    pub edibility: Option<String>,
    pub toxicity: Option<String>,
    pub season_start: Option<i32>,
    pub season_end: Option<i32>,
    pub cap_shape: Option<String>,
    pub cap_color: Option<String>,
    pub gill_attachment: Option<String>,
    pub spore_print_color: Option<String>,
    pub occurrence: Option<String>,
    pub image_url: Option<String>,
}

/// Filters accepted by species listing. Absent fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesFilter {
    /// Case-insensitive substring of the scientific or any common name.
    pub search: Option<String>,
    pub edibility: Option<String>,
    pub occurrence: Option<String>,
    pub genus_id: Option<DbId>,
    pub family_id: Option<DbId>,
    pub order_id: Option<DbId>,
    pub class_id: Option<DbId>,
    pub division_id: Option<DbId>,
    /// Month (1-12) that must fall inside the species' fruiting season.
    pub season: Option<i32>,
}
