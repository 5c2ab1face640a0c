//! Conversion between WGS84 and the Swiss LV95 grid (EPSG:2056).
//!
//! Uses the approximate polynomial formulas published by swisstopo, which
//! are accurate to about one metre inside Switzerland. Outside the country
//! the results degrade quickly and should not be relied upon.

use serde::Serialize;

/// A point on the Swiss LV95 grid, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lv95 {
    pub east: f64,
    pub north: f64,
}

/// Convert WGS84 latitude/longitude (degrees) to LV95.
pub fn wgs84_to_lv95(latitude: f64, longitude: f64) -> Lv95 {
    // Auxiliary values in units of 10000 arc seconds relative to Bern.
    let phi = (latitude * 3600.0 - 169_028.66) / 10_000.0;
    let lambda = (longitude * 3600.0 - 26_782.5) / 10_000.0;

    let east = 2_600_072.37 + 211_455.93 * lambda
        - 10_938.51 * lambda * phi
        - 0.36 * lambda * phi.powi(2)
        - 44.54 * lambda.powi(3);

    let north = 1_200_147.07 + 308_807.95 * phi + 3_745.25 * lambda.powi(2) + 76.63 * phi.powi(2)
        - 194.56 * lambda.powi(2) * phi
        + 119.79 * phi.powi(3);

    Lv95 { east, north }
}

/// Convert LV95 easting/northing (metres) to WGS84 `(latitude, longitude)`.
pub fn lv95_to_wgs84(east: f64, north: f64) -> (f64, f64) {
    let y = (east - 2_600_000.0) / 1_000_000.0;
    let x = (north - 1_200_000.0) / 1_000_000.0;

    let lambda = 2.677_909_4 + 4.728_982 * y + 0.791_484 * y * x + 0.1306 * y * x.powi(2)
        - 0.0436 * y.powi(3);

    let phi = 16.902_389_2 + 3.238_272 * x
        - 0.270_978 * y.powi(2)
        - 0.002_528 * x.powi(2)
        - 0.0447 * y.powi(2) * x
        - 0.0140 * x.powi(3);

    // Results are in units of 10000 arc seconds.
    (phi * 100.0 / 36.0, lambda * 100.0 / 36.0)
}
