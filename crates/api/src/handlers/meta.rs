use axum::Json;
use serde::Serialize;
use worklog_core::taxonomy::{ProjectType, Stage, TaskType, TransportMode, WorkStatus};

use crate::middleware::rbac::RequireAuth;

/// Option lists for the task log form and the report filters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOptions {
    pub stages: Vec<&'static str>,
    pub task_types: Vec<&'static str>,
    pub statuses: Vec<&'static str>,
    pub transport_modes: Vec<&'static str>,
    pub project_types: Vec<&'static str>,
}

/// GET /api/v1/meta/task-options
pub async fn get_task_options(RequireAuth(_user): RequireAuth) -> Json<TaskOptions> {
    Json(TaskOptions {
        stages: Stage::labels(),
        task_types: TaskType::labels(),
        statuses: WorkStatus::labels(),
        transport_modes: TransportMode::labels(),
        project_types: ProjectType::labels(),
    })
}
