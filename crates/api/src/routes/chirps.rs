//! Route definitions for the `/chirps` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::chirps;
use crate::state::AppState;

/// Routes mounted at `/chirps`.
///
/// ```text
/// GET  /            -> list_chirps
/// POST /            -> create_chirp (requires auth)
/// GET  /{chirp_id}  -> get_chirp
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chirps::list_chirps).post(chirps::create_chirp))
        .route("/{chirp_id}", get(chirps::get_chirp))
}
