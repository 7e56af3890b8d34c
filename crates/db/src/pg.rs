//! PostgreSQL-backed [`WorklogStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use worklog_core::filter::{DateWindow, ReportFilter};
use worklog_core::records::{ProjectRecord, StaffRecord, TaskLogView};
use worklog_core::task_log::NewTaskLog;
use worklog_core::types::DbId;

use crate::repositories::{ProjectRepo, StaffRepo, TaskLogRepo};
use crate::store::{StoreError, Upserted, WorklogStore};
use crate::DbPool;

/// Foreign-key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PgWorklogStore {
    pool: DbPool,
}

impl PgWorklogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorklogStore for PgWorklogStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_task_logs(&self, filter: &ReportFilter) -> Result<Vec<TaskLogView>, StoreError> {
        let rows = TaskLogRepo::list_joined(&self.pool, filter).await?;
        Ok(rows.into_iter().map(TaskLogView::from).collect())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let rows = ProjectRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(ProjectRecord::from).collect())
    }

    async fn find_project(&self, id: DbId) -> Result<Option<ProjectRecord>, StoreError> {
        let row = ProjectRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(ProjectRecord::from))
    }

    async fn list_staff(&self) -> Result<Vec<StaffRecord>, StoreError> {
        let rows = StaffRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(StaffRecord::from).collect())
    }

    async fn count_logs_by_employee(
        &self,
        window: &DateWindow,
    ) -> Result<HashMap<DbId, u64>, StoreError> {
        let rows = TaskLogRepo::count_by_employee(&self.pool, window).await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.employee_id, r.log_count.max(0) as u64))
            .collect())
    }

    async fn distinct_work_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(TaskLogRepo::distinct_work_dates(&self.pool).await?)
    }

    async fn upsert_task_log(&self, log: &NewTaskLog) -> Result<Upserted, StoreError> {
        match TaskLogRepo::upsert(&self.pool, log).await {
            Ok(row) => Ok(Upserted {
                log: row.log,
                created: row.inserted,
            }),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                let constraint = db_err.constraint().unwrap_or_default();
                if constraint.contains("employee") {
                    Err(StoreError::UnknownReference {
                        entity: "staff",
                        id: log.employee_id,
                    })
                } else {
                    Err(StoreError::UnknownReference {
                        entity: "project",
                        id: log.project_id,
                    })
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}
