//! Random demo findings around well-known Swiss places.
//!
//! Used by the `myco generate-findings` command to populate a developer
//! database. Generic over [`Rng`] so tests can use a seeded generator.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::types::{DbId, Timestamp};

/// A named place with WGS84 coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const SWISS_PLACES: &[Place] = &[
    Place {
        name: "Zürich",
        latitude: 47.3769,
        longitude: 8.5417,
    },
    Place {
        name: "Geneva",
        latitude: 46.2044,
        longitude: 6.1432,
    },
    Place {
        name: "Basel",
        latitude: 47.5596,
        longitude: 7.5886,
    },
    Place {
        name: "Bern",
        latitude: 46.9480,
        longitude: 7.4474,
    },
    Place {
        name: "Lausanne",
        latitude: 46.5197,
        longitude: 6.6323,
    },
    Place {
        name: "Lucerne",
        latitude: 47.0502,
        longitude: 8.3093,
    },
    Place {
        name: "Lugano",
        latitude: 46.0037,
        longitude: 8.9511,
    },
    Place {
        name: "St. Gallen",
        latitude: 47.4239,
        longitude: 9.3745,
    },
    Place {
        name: "Interlaken",
        latitude: 46.6863,
        longitude: 7.8632,
    },
    Place {
        name: "Zermatt",
        latitude: 46.0207,
        longitude: 7.7491,
    },
    Place {
        name: "Grindelwald",
        latitude: 46.6247,
        longitude: 8.0412,
    },
    Place {
        name: "Davos",
        latitude: 46.8008,
        longitude: 9.8355,
    },
    Place {
        name: "Thun",
        latitude: 46.7583,
        longitude: 7.6278,
    },
    Place {
        name: "Montreux",
        latitude: 46.4312,
        longitude: 6.9107,
    },
    Place {
        name: "Neuchâtel",
        latitude: 46.9893,
        longitude: 6.9298,
    },
];

pub const WEATHER: &[&str] = &["sunny", "cloudy", "rainy", "foggy"];

pub const NOTES: &[&str] = &[
    "Found near a large oak tree",
    "Growing in a cluster",
    "Spotted after recent rainfall",
    "Located in shaded area",
    "Found near hiking trail",
    "Growing on dead wood",
    "In mixed forest area",
    "Near a small stream",
    "Under pine trees",
    "In mossy area",
];

/// Maximum offset in degrees applied to each coordinate.
pub const JITTER_DEGREES: f64 = 0.05;

/// Findings are dated up to this many days in the past.
pub const MAX_DAYS_AGO: i64 = 90;

pub const QUANTITY_RANGE: (i32, i32) = (1, 15);

pub const TEMPERATURE_RANGE: (f64, f64) = (5.0, 25.0);

/// A generated finding, ready to insert.
#[derive(Debug, Clone)]
pub struct DemoFinding {
    pub species_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub found_at: Timestamp,
    pub quantity: i32,
    pub weather: String,
    pub temperature: f64,
    pub notes: String,
}

fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Generate one finding for a species drawn from `species_ids`.
///
/// Returns `None` when `species_ids` is empty.
pub fn generate_finding<R: Rng>(rng: &mut R, species_ids: &[DbId]) -> Option<DemoFinding> {
    if species_ids.is_empty() {
        return None;
    }

    let species_id = *pick(rng, species_ids);
    let place = pick(rng, SWISS_PLACES);
    let latitude = place.latitude + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES);
    let longitude = place.longitude + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES);
    let days_ago = rng.random_range(0..=MAX_DAYS_AGO);
    let temperature = rng.random_range(TEMPERATURE_RANGE.0..TEMPERATURE_RANGE.1);

    Some(DemoFinding {
        species_id,
        latitude,
        longitude,
        location: format!("Near {}", place.name),
        found_at: Utc::now() - Duration::days(days_ago),
        quantity: rng.random_range(QUANTITY_RANGE.0..=QUANTITY_RANGE.1),
        weather: pick(rng, WEATHER).to_string(),
        temperature: (temperature * 10.0).round() / 10.0,
        notes: pick(rng, NOTES).to_string(),
    })
}
