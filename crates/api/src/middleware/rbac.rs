use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use myco_core::authorization::require_admin;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller with the `admin` role; 403 otherwise.
///
/// ```ignore
/// async fn create_species(RequireAdmin(admin): RequireAdmin) -> AppResult<StatusCode> { .. }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_admin(user.actor())?;
        Ok(RequireAdmin(user))
    }
}
