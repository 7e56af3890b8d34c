//! Repository for the `task_logs` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use worklog_core::filter::{DateWindow, ReportFilter};
use worklog_core::task_log::NewTaskLog;

use crate::filter_sql::{bind_values, render_report_filter, render_window};
use crate::models::task_log::{EmployeeLogCount, TaskLogJoinedRow, UpsertedRow};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `task_logs` SELECT / RETURNING clauses.
const COLUMNS: &str = "\
    id, employee_id, project_id, work_date, stage, task_type, status, description, \
    project_hours, travel_hours, total_man_hours, leaves_office, transport_mode, \
    mileage, destination, created_at, updated_at";

/// Column list for the joined report view. `t` is `task_logs`, `s` is
/// `staff`, `p` is `projects`.
const JOINED_COLUMNS: &str = "\
    t.id, t.employee_id, s.name AS employee_name, s.email AS employee_email, \
    t.project_id, p.project_number, p.project_name, p.project_type, p.architect, \
    t.work_date, t.stage, t.task_type, t.status, t.description, \
    t.project_hours, t.travel_hours, t.leaves_office, t.transport_mode, \
    t.mileage, t.destination";

// ---------------------------------------------------------------------------
// TaskLogRepo
// ---------------------------------------------------------------------------

/// Provides report reads and the idempotent submission write for task logs.
pub struct TaskLogRepo;

impl TaskLogRepo {
    /// Logs matching `filter`, left-joined with their engineer and project.
    pub async fn list_joined(
        pool: &PgPool,
        filter: &ReportFilter,
    ) -> Result<Vec<TaskLogJoinedRow>, sqlx::Error> {
        let sql = render_report_filter(filter, "t");
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM task_logs t \
             LEFT JOIN staff s ON s.id = t.employee_id \
             LEFT JOIN projects p ON p.id = t.project_id \
             {} \
             ORDER BY t.work_date DESC, t.id",
            sql.where_clause
        );
        bind_values(sqlx::query_as::<_, TaskLogJoinedRow>(&query), &sql.bind_values)
            .fetch_all(pool)
            .await
    }

    /// Insert a log, or update the existing one for the same
    /// (project, employee, work date).
    ///
    /// Uses `ON CONFLICT ... DO UPDATE` so concurrent duplicate submissions
    /// resolve to a single row. `inserted` is derived from `xmax`, which is
    /// zero only for a freshly inserted tuple.
    pub async fn upsert(pool: &PgPool, input: &NewTaskLog) -> Result<UpsertedRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_logs \
                (employee_id, project_id, work_date, stage, task_type, status, description, \
                 project_hours, travel_hours, leaves_office, transport_mode, mileage, destination) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT ON CONSTRAINT uq_task_logs_project_employee_date DO UPDATE \
             SET stage = EXCLUDED.stage, \
                 task_type = EXCLUDED.task_type, \
                 status = EXCLUDED.status, \
                 description = EXCLUDED.description, \
                 project_hours = EXCLUDED.project_hours, \
                 travel_hours = EXCLUDED.travel_hours, \
                 leaves_office = EXCLUDED.leaves_office, \
                 transport_mode = EXCLUDED.transport_mode, \
                 mileage = EXCLUDED.mileage, \
                 destination = EXCLUDED.destination, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        sqlx::query_as::<_, UpsertedRow>(&query)
            .bind(input.employee_id)
            .bind(input.project_id)
            .bind(input.work_date)
            .bind(input.stage.as_str())
            .bind(input.task_type.as_str())
            .bind(input.status.as_str())
            .bind(&input.description)
            .bind(input.project_hours)
            .bind(input.travel_hours)
            .bind(input.leaves_office)
            .bind(input.transport_mode.map(|m| m.as_str()))
            .bind(input.mileage)
            .bind(&input.destination)
            .fetch_one(pool)
            .await
    }

    /// Per-employee log counts inside `window`. Employees without logs are absent.
    pub async fn count_by_employee(
        pool: &PgPool,
        window: &DateWindow,
    ) -> Result<Vec<EmployeeLogCount>, sqlx::Error> {
        let sql = render_window(window, "t");
        let query = format!(
            "SELECT t.employee_id, COUNT(*)::BIGINT AS log_count \
             FROM task_logs t {} \
             GROUP BY t.employee_id",
            sql.where_clause
        );
        bind_values(sqlx::query_as::<_, EmployeeLogCount>(&query), &sql.bind_values)
            .fetch_all(pool)
            .await
    }

    /// Every distinct work date present, most recent first.
    pub async fn distinct_work_dates(pool: &PgPool) -> Result<Vec<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar::<_, NaiveDate>(
            "SELECT DISTINCT work_date FROM task_logs ORDER BY work_date DESC",
        )
        .fetch_all(pool)
        .await
    }
}
