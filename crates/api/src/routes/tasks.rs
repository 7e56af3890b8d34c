use axum::routing::post;
use axum::Router;

use crate::handlers::task_logs;
use crate::state::AppState;

/// Task log routes, merged at the `/api/v1` root.
///
/// ```text
/// POST /tasks    -> submit_task_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/tasks", post(task_logs::submit_task_log))
}
