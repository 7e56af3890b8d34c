use std::sync::Arc;

use worklog_db::WorklogStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Task log, project and staff storage. Postgres in production, the
    /// in-memory store in tests.
    pub store: Arc<dyn WorklogStore>,
    pub config: Arc<ServerConfig>,
}
