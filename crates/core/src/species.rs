//! Species attributes: edibility, occurrence, and fruiting season.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Edibility
// ---------------------------------------------------------------------------

/// Culinary classification of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edibility {
    Edible,
    Poisonous,
    Inedible,
    Medicinal,
    Psychoactive,
    #[default]
    Unknown,
}

impl Edibility {
    /// Return the value as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edible => "edible",
            Self::Poisonous => "poisonous",
            Self::Inedible => "inedible",
            Self::Medicinal => "medicinal",
            Self::Psychoactive => "psychoactive",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stored value. Returns `None` for unknown strings.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "edible" => Some(Self::Edible),
            "poisonous" => Some(Self::Poisonous),
            "inedible" => Some(Self::Inedible),
            "medicinal" => Some(Self::Medicinal),
            "psychoactive" => Some(Self::Psychoactive),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &[
        "edible",
        "poisonous",
        "inedible",
        "medicinal",
        "psychoactive",
        "unknown",
    ];
}

impl std::fmt::Display for Edibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Occurrence
// ---------------------------------------------------------------------------

/// How often a species is encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    Common,
    Frequent,
    #[default]
    Occasional,
    Rare,
    VeryRare,
}

impl Occurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Frequent => "frequent",
            Self::Occasional => "occasional",
            Self::Rare => "rare",
            Self::VeryRare => "very_rare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Self::Common),
            "frequent" => Some(Self::Frequent),
            "occasional" => Some(Self::Occasional),
            "rare" => Some(Self::Rare),
            "very_rare" => Some(Self::VeryRare),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] =
        &["common", "frequent", "occasional", "rare", "very_rare"];
}

impl std::fmt::Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an edibility string coming from a request body or filter.
pub fn validate_edibility(value: &str) -> Result<Edibility, CoreError> {
    Edibility::from_str(value).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid edibility '{value}'. Must be one of: {}",
            Edibility::ALL.join(", ")
        ))
    })
}

/// Validate an occurrence string coming from a request body or filter.
pub fn validate_occurrence(value: &str) -> Result<Occurrence, CoreError> {
    Occurrence::from_str(value).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid occurrence '{value}'. Must be one of: {}",
            Occurrence::ALL.join(", ")
        ))
    })
}

/// Months are 1 (January) through 12 (December).
pub fn validate_month(month: i32) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(format!(
            "Month must be between 1 and 12, got {month}"
        )));
    }
    Ok(())
}

/// Validate the optional season bounds of a species.
///
/// Either bound may be absent; present bounds must be valid months. A
/// start after the end is allowed and means the season spans new year.
pub fn validate_season(start: Option<i32>, end: Option<i32>) -> Result<(), CoreError> {
    if let Some(start) = start {
        validate_month(start)?;
    }
    if let Some(end) = end {
        validate_month(end)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Whether `month` falls in the inclusive season `start..=end`.
///
/// When `start > end` the season wraps across the end of the year, e.g.
/// November to February contains December and January.
pub fn season_contains(start: i32, end: i32, month: i32) -> bool {
    if start <= end {
        start <= month && month <= end
    } else {
        month >= start || month <= end
    }
}
