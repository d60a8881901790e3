use std::sync::Arc;

use crate::config::ServerConfig;
use crate::metrics::FileserverMetrics;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: chirpy_db::DbPool,
    /// Server configuration, including the JWT signing secret.
    pub config: Arc<ServerConfig>,
    /// File-server hit counter reported by `/admin/metrics`.
    pub metrics: Arc<FileserverMetrics>,
}

impl AppState {
    pub fn new(pool: chirpy_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            metrics: Arc::new(FileserverMetrics::new()),
        }
    }
}
