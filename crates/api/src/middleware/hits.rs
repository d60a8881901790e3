//! Hit counting for the static file server.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Increment the file-server hit counter, then serve the request.
///
/// Attach with `axum::middleware::from_fn_with_state` to the `/app` subtree
/// only; API traffic is not counted.
pub async fn count_fileserver_hits(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state.metrics.record_hit();
    next.run(request).await
}
