//! Task log row models.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use worklog_core::records::TaskLogView;
use worklog_core::types::{DbId, Hours, Timestamp};

/// A row from the `task_logs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLog {
    pub id: DbId,
    pub employee_id: DbId,
    pub project_id: DbId,
    pub work_date: NaiveDate,
    pub stage: String,
    pub task_type: String,
    pub status: String,
    pub description: Option<String>,
    pub project_hours: Hours,
    pub travel_hours: Hours,
    /// Generated column; always `project_hours + travel_hours`.
    pub total_man_hours: Hours,
    pub leaves_office: bool,
    pub transport_mode: Option<String>,
    pub mileage: Option<f64>,
    pub destination: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result row of an upsert: the stored log and whether it was inserted.
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedRow {
    #[sqlx(flatten)]
    pub log: TaskLog,
    pub inserted: bool,
}

/// A task log left-joined with its engineer and project.
#[derive(Debug, Clone, FromRow)]
pub struct TaskLogJoinedRow {
    pub id: DbId,
    pub employee_id: DbId,
    pub employee_name: Option<String>,
    pub employee_email: Option<String>,
    pub project_id: DbId,
    pub project_number: Option<String>,
    pub project_name: Option<String>,
    pub project_type: Option<String>,
    pub architect: Option<String>,
    pub work_date: NaiveDate,
    pub stage: String,
    pub task_type: String,
    pub status: String,
    pub description: Option<String>,
    pub project_hours: Hours,
    pub travel_hours: Hours,
    pub leaves_office: bool,
    pub transport_mode: Option<String>,
    pub mileage: Option<f64>,
    pub destination: Option<String>,
}

impl From<TaskLogJoinedRow> for TaskLogView {
    fn from(row: TaskLogJoinedRow) -> Self {
        TaskLogView {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            employee_email: row.employee_email,
            project_id: row.project_id,
            project_number: row.project_number,
            project_name: row.project_name,
            project_type: row.project_type,
            architect: row.architect,
            work_date: row.work_date,
            stage: row.stage,
            task_type: row.task_type,
            status: row.status,
            description: row.description,
            project_hours: row.project_hours,
            travel_hours: row.travel_hours,
            leaves_office: row.leaves_office,
            transport_mode: row.transport_mode,
            mileage: row.mileage,
            destination: row.destination,
        }
    }
}

/// Number of logs one employee has in a date window.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct EmployeeLogCount {
    pub employee_id: DbId,
    pub log_count: i64,
}
