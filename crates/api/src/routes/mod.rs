pub mod admin;
pub mod health;
pub mod meta;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /admin/master-schedule                     schedule rows (GET, admin)
/// /admin/analytics                           analytics sections (GET, admin)
/// /admin/project-stage-dist                  projects by stage (GET, admin)
/// /admin/project-status-dist                 projects by status (GET, admin)
/// /admin/project-stats                       project KPI totals (GET, admin)
/// /admin/weekly-submission-report            weekly compliance (GET, admin)
/// /admin/weekly-submission-report/weeks      weeks with logs (GET, admin)
///
/// /tasks                                     submit a task log (POST, auth)
///
/// /meta/task-options                         form option lists (GET, auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/admin", admin::router())
        .merge(tasks::router())
        .nest("/meta", meta::router())
}
