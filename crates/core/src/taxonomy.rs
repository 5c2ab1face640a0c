//! Taxonomic ranks above species.
//!
//! The hierarchy is Division -> Class -> Order -> Family -> Genus, with
//! species hanging off genera. Every rank lives in its own table with the
//! same shape (`name`, `common_name`, `description`, parent id), so the
//! repository and HTTP layers are written once and parameterised by
//! [`TaxonRank`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonRank {
    Division,
    Class,
    Order,
    Family,
    Genus,
}

impl TaxonRank {
    /// All ranks, top of the hierarchy first.
    pub const ALL: [TaxonRank; 5] = [
        Self::Division,
        Self::Class,
        Self::Order,
        Self::Family,
        Self::Genus,
    ];

    /// Database table holding rows of this rank.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Division => "divisions",
            Self::Class => "classes",
            Self::Order => "orders",
            Self::Family => "families",
            Self::Genus => "genera",
        }
    }

    /// Column referencing the parent rank, `None` for divisions.
    pub fn parent_column(&self) -> Option<&'static str> {
        match self {
            Self::Division => None,
            Self::Class => Some("division_id"),
            Self::Order => Some("class_id"),
            Self::Family => Some("order_id"),
            Self::Genus => Some("family_id"),
        }
    }

    pub fn parent(&self) -> Option<TaxonRank> {
        match self {
            Self::Division => None,
            Self::Class => Some(Self::Division),
            Self::Order => Some(Self::Class),
            Self::Family => Some(Self::Order),
            Self::Genus => Some(Self::Family),
        }
    }

    /// URL segment under `/taxonomy`.
    pub fn route_segment(&self) -> &'static str {
        // Route segments match table names.
        self.table()
    }

    /// Human-readable singular name, used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Division => "Division",
            Self::Class => "Class",
            Self::Order => "Order",
            Self::Family => "Family",
            Self::Genus => "Genus",
        }
    }

    /// Parse a `/taxonomy/{segment}` path component.
    pub fn from_route_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.route_segment() == segment)
    }

    pub fn requires_parent(&self) -> bool {
        self.parent().is_some()
    }
}

impl std::fmt::Display for TaxonRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
