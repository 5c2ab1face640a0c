use axum::routing::get;
use axum::Router;

use crate::handlers::species;
use crate::state::AppState;

/// Routes mounted at `/species`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(species::list_species).post(species::create_species))
        .route(
            "/{id}",
            get(species::get_species)
                .put(species::update_species)
                .delete(species::delete_species),
        )
}
