//! Route definitions for the `/admin` reports.

use axum::routing::get;
use axum::Router;

use crate::handlers::{reports, weekly};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET /master-schedule                   -> get_master_schedule
/// GET /analytics                         -> get_analytics
/// GET /project-stage-dist                -> get_project_stage_dist
/// GET /project-status-dist               -> get_project_status_dist
/// GET /project-stats                     -> get_project_stats
/// GET /weekly-submission-report          -> get_weekly_report
/// GET /weekly-submission-report/weeks    -> list_weeks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/master-schedule", get(reports::get_master_schedule))
        .route("/analytics", get(reports::get_analytics))
        .route("/project-stage-dist", get(reports::get_project_stage_dist))
        .route("/project-status-dist", get(reports::get_project_status_dist))
        .route("/project-stats", get(reports::get_project_stats))
        .route("/weekly-submission-report", get(weekly::get_weekly_report))
        .route("/weekly-submission-report/weeks", get(weekly::list_weeks))
}
