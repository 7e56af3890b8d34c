//! Weekly submission compliance handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use worklog_core::compliance::{
    available_weeks, weekly_submission_report, AvailableWeek, WeekWindow, WeeklySubmissionReport,
};

use crate::error::AppResult;
use crate::handlers::query_params;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportParams {
    pub week_start: Option<String>,
    pub week_end: Option<String>,
}

/// GET /api/v1/admin/weekly-submission-report
///
/// Which staff logged at least one task in the week. Defaults to the current
/// week; any `weekStart` is normalized to its Monday.
pub async fn get_weekly_report(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    params: Result<Query<WeeklyReportParams>, QueryRejection>,
) -> AppResult<Json<WeeklySubmissionReport>> {
    let params = query_params(params)?;
    let window = WeekWindow::from_query(
        params.week_start.as_deref(),
        params.week_end.as_deref(),
        Utc::now().date_naive(),
    )?;
    tracing::debug!(
        admin_id = admin.user_id,
        week_start = %window.start,
        week_end = %window.end,
        "Building weekly submission report",
    );

    let week = window.date_window();
    let (staff, counts) = tokio::join!(
        state.store.list_staff(),
        state.store.count_logs_by_employee(&week),
    );
    let report = weekly_submission_report(window, &staff?, &counts?);
    Ok(Json(report))
}

/// GET /api/v1/admin/weekly-submission-report/weeks
///
/// Weeks that contain at least one task log, most recent first.
pub async fn list_weeks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AvailableWeek>>> {
    let dates = state.store.distinct_work_dates().await?;
    Ok(Json(available_weeks(dates)))
}
