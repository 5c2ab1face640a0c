//! Validation for recorded findings.

use crate::error::CoreError;

/// Quantity recorded when the client does not send one.
pub const DEFAULT_QUANTITY: i32 = 1;

/// Latitude must be within [-90, 90] and longitude within [-180, 180].
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::Validation(format!(
            "Latitude must be between -90 and 90, got {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation(format!(
            "Longitude must be between -180 and 180, got {longitude}"
        )));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity < 1 {
        return Err(CoreError::Validation(format!(
            "Quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}
