pub mod auth;
pub mod findings;
pub mod health;
pub mod species;
pub mod taxonomy;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout
/// /auth/me                           current user
///
/// /species                           list, create (admin)
/// /species/{id}                      get, update (admin), delete (admin)
///
/// /findings                          list, create
/// /findings/map                      map points
/// /findings/{id}                     get, update, delete (owner or admin)
///
/// /taxonomy/{rank}                   list, create (admin)
/// /taxonomy/{rank}/{id}              get, update (admin), delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/species", species::router())
        .nest("/findings", findings::router())
        .nest("/taxonomy", taxonomy::router())
}
