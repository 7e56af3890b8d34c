//! Storage abstraction for the report and submission paths.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use worklog_core::filter::{DateWindow, ReportFilter};
use worklog_core::records::{ProjectRecord, StaffRecord, TaskLogView};
use worklog_core::task_log::NewTaskLog;
use worklog_core::types::DbId;

use crate::models::task_log::TaskLog;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A write referenced a row that does not exist.
    #[error("Unknown {entity} with id {id}")]
    UnknownReference { entity: &'static str, id: DbId },

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of an idempotent task log submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
    pub log: TaskLog,
    /// `true` when a new row was inserted, `false` when an existing row for
    /// the same (project, employee, work date) was updated.
    pub created: bool,
}

/// Everything the API reads and writes.
///
/// Implementations must enforce the (project, employee, work date)
/// uniqueness of task logs atomically: a second submission for the same key
/// updates the stored row.
#[async_trait]
pub trait WorklogStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Joined task logs matching `filter`, most recent work date first.
    async fn list_task_logs(&self, filter: &ReportFilter) -> Result<Vec<TaskLogView>, StoreError>;

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError>;

    async fn find_project(&self, id: DbId) -> Result<Option<ProjectRecord>, StoreError>;

    async fn list_staff(&self) -> Result<Vec<StaffRecord>, StoreError>;

    /// Log count per employee inside `window`. Employees without logs are absent.
    async fn count_logs_by_employee(
        &self,
        window: &DateWindow,
    ) -> Result<HashMap<DbId, u64>, StoreError>;

    /// Distinct work dates across all logs, most recent first.
    async fn distinct_work_dates(&self) -> Result<Vec<NaiveDate>, StoreError>;

    /// Insert or update the log for `(project, employee, work date)`.
    async fn upsert_task_log(&self, log: &NewTaskLog) -> Result<Upserted, StoreError>;
}
