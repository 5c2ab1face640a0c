use axum::routing::get;
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/taxonomy`. `{rank}` is one of `divisions`,
/// `classes`, `orders`, `families` or `genera`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{rank}",
            get(taxonomy::list_taxa).post(taxonomy::create_taxon),
        )
        .route(
            "/{rank}/{id}",
            get(taxonomy::get_taxon)
                .put(taxonomy::update_taxon)
                .delete(taxonomy::delete_taxon),
        )
}
