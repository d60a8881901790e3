pub mod admin;
pub mod auth;
pub mod chirps;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthz                 service and database health
///
/// /users                   register (POST)
/// /login                   login (POST)
///
/// /chirps                  list (GET), create (POST, requires auth)
/// /chirps/{chirp_id}       get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/users", users::router())
        .merge(auth::router())
        .nest("/chirps", chirps::router())
}

/// Build the `/admin` route tree.
///
/// ```text
/// /metrics                 file-server hit count (GET)
/// /reset                   delete all users, dev only (POST)
/// ```
pub fn admin_routes() -> Router<AppState> {
    admin::router()
}
