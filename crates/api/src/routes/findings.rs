use axum::routing::get;
use axum::Router;

use crate::handlers::findings;
use crate::state::AppState;

/// Routes mounted at `/findings`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(findings::list_findings).post(findings::create_finding))
        .route("/map", get(findings::map_findings))
        .route(
            "/{id}",
            get(findings::get_finding)
                .put(findings::update_finding)
                .delete(findings::delete_finding),
        )
}
