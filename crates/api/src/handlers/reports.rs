//! Admin report handlers: master schedule, analytics and the project-level
//! distribution and KPI views.
//!
//! All endpoints require the admin role via [`RequireAdmin`]. Query
//! parameters are validated into a [`ReportFilter`] before the store is
//! touched.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use worklog_core::error::CoreError;
use worklog_core::filter::{ReportFilter, ReportQuery, ScopeQuery};
use worklog_core::projects::{
    project_distribution, project_stats, Dimension, Distribution, ProjectScope, ProjectStats,
};
use worklog_core::records::{ProjectRecord, TaskLogView};
use worklog_core::report::{analytics_report, AnalyticsInputs, AnalyticsReport};
use worklog_core::schedule::{master_schedule, ScheduleRow};
use worklog_db::StoreError;

use crate::error::{AppError, AppResult};
use crate::handlers::query_params;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /admin/analytics`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    #[serde(flatten)]
    pub filter: ReportQuery,
    pub trend_year: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/master-schedule
pub async fn get_master_schedule(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> AppResult<Json<Vec<ScheduleRow>>> {
    let filter = query_params(query)?.build()?;
    tracing::debug!(
        admin_id = admin.user_id,
        ?filter,
        unfiltered = filter.is_unfiltered(),
        "Building master schedule",
    );

    let logs = state.store.list_task_logs(&filter).await?;
    Ok(Json(master_schedule(logs)))
}

/// GET /api/v1/admin/analytics
///
/// Loads the filtered task logs and the project directory concurrently. A
/// section whose input failed is left out and named in `omittedSections`;
/// the request only fails when neither input could be loaded.
pub async fn get_analytics(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    params: Result<Query<AnalyticsParams>, QueryRejection>,
) -> AppResult<Json<AnalyticsReport>> {
    let params = query_params(params)?;
    let filter = params.filter.build()?;
    let today = Utc::now().date_naive();
    let trend_year = resolve_trend_year(params.trend_year.as_deref(), &filter, today)?;
    tracing::debug!(admin_id = admin.user_id, ?filter, trend_year, "Building analytics");

    let (logs, projects) = tokio::join!(
        state.store.list_task_logs(&filter),
        state.store.list_projects(),
    );

    let (logs, projects) = match (logs, projects) {
        (Err(logs_err), Err(projects_err)) => {
            tracing::error!(error = %projects_err, "Failed to load projects for analytics");
            return Err(logs_err.into());
        }
        (logs, projects) => (loaded("task logs", logs), loaded("projects", projects)),
    };

    let report = analytics_report(AnalyticsInputs {
        filter: &filter,
        logs: logs.as_deref(),
        projects: projects.as_deref(),
        trend_year,
        today,
    });

    if !report.omitted_sections.is_empty() {
        let omitted: Vec<&str> = report.omitted_sections.iter().map(|s| s.as_str()).collect();
        tracing::warn!(?omitted, "Analytics returned with omitted sections");
    }

    Ok(Json(report))
}

/// GET /api/v1/admin/project-stage-dist
pub async fn get_project_stage_dist(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> AppResult<Json<Distribution>> {
    let filter = query_params(query)?.build()?;
    let (projects, logs) = load_scope_inputs(&state, &filter).await?;
    let scope = ProjectScope::resolve(&filter, &projects, &logs);
    Ok(Json(project_distribution(&scope, Dimension::Stage)))
}

/// GET /api/v1/admin/project-status-dist
pub async fn get_project_status_dist(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> AppResult<Json<Distribution>> {
    let filter = query_params(query)?.build()?;
    let (projects, logs) = load_scope_inputs(&state, &filter).await?;
    let scope = ProjectScope::resolve(&filter, &projects, &logs);
    Ok(Json(project_distribution(&scope, Dimension::Status)))
}

/// GET /api/v1/admin/project-stats
pub async fn get_project_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> AppResult<Json<ProjectStats>> {
    let filter = query_params(query)?.build()?;
    let (projects, logs) = load_scope_inputs(&state, &filter).await?;
    let scope = ProjectScope::resolve(&filter, &projects, &logs);
    tracing::debug!(?filter, projects = scope.len(), "Computed project stats scope");
    Ok(Json(project_stats(&scope)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Keep a loaded input, or log the failure and drop it.
fn loaded<T>(input: &'static str, result: Result<Vec<T>, StoreError>) -> Option<Vec<T>> {
    match result {
        Ok(rows) => Some(rows),
        Err(err) => {
            tracing::warn!(input, error = %err, "Analytics input unavailable");
            None
        }
    }
}

/// The project directory plus, for activity-scoped filters, the matching
/// logs that decide which projects are in scope.
async fn load_scope_inputs(
    state: &AppState,
    filter: &ReportFilter,
) -> AppResult<(Vec<ProjectRecord>, Vec<TaskLogView>)> {
    if !filter.is_activity_scoped() {
        return Ok((state.store.list_projects().await?, Vec::new()));
    }
    let (projects, logs) = tokio::join!(
        state.store.list_projects(),
        state.store.list_task_logs(filter),
    );
    Ok((projects?, logs?))
}

/// Year of the transport trend: `trendYear` if given, else the year of the
/// end date, else the current year.
fn resolve_trend_year(
    raw: Option<&str>,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Result<i32, AppError> {
    if let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) {
        return match raw.parse::<i32>() {
            Ok(year) if (1900..=9999).contains(&year) => Ok(year),
            _ => Err(CoreError::invalid_field("trendYear", format!("'{raw}' is not a year")).into()),
        };
    }
    Ok(filter
        .window
        .end_date()
        .map_or(today.year(), |end| end.year()))
}
