use axum::routing::get;
use axum::Router;

use crate::handlers::meta;
use crate::state::AppState;

/// Routes mounted at `/meta`.
pub fn router() -> Router<AppState> {
    Router::new().route("/task-options", get(meta::get_task_options))
}
