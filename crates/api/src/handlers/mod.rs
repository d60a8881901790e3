//! Request handlers, grouped by resource.
//!
//! Route wiring lives in [`crate::routes`]; this module only holds the
//! handler functions and their request/response types.

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;

use crate::error::{AppError, AppResult};

/// Run CPU-bound work (password hashing) on tokio's blocking pool so it never
/// stalls the async workers.
pub(crate) async fn run_blocking<F, T>(work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Blocking task failed: {e}")))
}
