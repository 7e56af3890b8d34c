//! Task log submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use worklog_core::error::CoreError;
use worklog_core::task_log::TaskLogSubmission;
use worklog_db::models::task_log::TaskLog;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// POST /api/v1/tasks
///
/// Record the caller's work on a project for one day. A second submission
/// for the same project and day replaces the first: 201 when a log was
/// created, 200 when an existing one was updated.
///
/// Staff may only log against projects they are assigned to; admins may log
/// against any project.
pub async fn submit_task_log(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    payload: Result<Json<TaskLogSubmission>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TaskLog>)> {
    let Json(submission) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let new_log = submission.into_new_task_log(user.user_id)?;

    let project = state
        .store
        .find_project(new_log.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: new_log.project_id,
        })?;

    if !user.is_admin() && !project.assignment.includes(user.user_id) {
        return Err(CoreError::Forbidden(format!(
            "Not assigned to project {}",
            project.project_number
        ))
        .into());
    }

    let upserted = state.store.upsert_task_log(&new_log).await?;

    tracing::info!(
        task_log_id = upserted.log.id,
        employee_id = user.user_id,
        project_id = new_log.project_id,
        work_date = %new_log.work_date,
        created = upserted.created,
        "Task log submitted",
    );

    let status = if upserted.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(upserted.log)))
}
