//! In-memory [`WorklogStore`].
//!
//! Holds the three tables behind one `RwLock`, so the uniqueness check and
//! the insert of an upsert happen under a single write guard. Used by the
//! API integration tests and for running the service without a database.
//! Individual inputs can be switched off with [`MemoryStore::set_unavailable`]
//! to exercise partial-failure handling.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use worklog_core::filter::{DateWindow, ReportFilter};
use worklog_core::records::{ProjectRecord, StaffRecord, TaskLogView};
use worklog_core::task_log::NewTaskLog;
use worklog_core::types::DbId;

use crate::models::task_log::TaskLog;
use crate::store::{StoreError, Upserted, WorklogStore};

/// A store input that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    TaskLogs,
    Projects,
    Staff,
}

impl Table {
    fn as_str(self) -> &'static str {
        match self {
            Table::TaskLogs => "task_logs",
            Table::Projects => "projects",
            Table::Staff => "staff",
        }
    }
}

#[derive(Default)]
struct Tables {
    staff: Vec<StaffRecord>,
    projects: Vec<ProjectRecord>,
    task_logs: Vec<TaskLog>,
    next_log_id: DbId,
    unavailable: HashSet<Table>,
}

impl Tables {
    fn check(&self, table: Table) -> Result<(), StoreError> {
        if self.unavailable.contains(&table) {
            return Err(StoreError::Unavailable(format!("{} is unavailable", table.as_str())));
        }
        Ok(())
    }

    fn join(&self, log: &TaskLog) -> TaskLogView {
        let staff = self.staff.iter().find(|s| s.id == log.employee_id);
        let project = self.projects.iter().find(|p| p.id == log.project_id);
        TaskLogView {
            id: log.id,
            employee_id: log.employee_id,
            employee_name: staff.map(|s| s.name.clone()),
            employee_email: staff.map(|s| s.email.clone()),
            project_id: log.project_id,
            project_number: project.map(|p| p.project_number.clone()),
            project_name: project.map(|p| p.project_name.clone()),
            project_type: project.and_then(|p| p.project_type.clone()),
            architect: project.and_then(|p| p.architect.clone()),
            work_date: log.work_date,
            stage: log.stage.clone(),
            task_type: log.task_type.clone(),
            status: log.status.clone(),
            description: log.description.clone(),
            project_hours: log.project_hours,
            travel_hours: log.travel_hours,
            leaves_office: log.leaves_office,
            transport_mode: log.transport_mode.clone(),
            mileage: log.mileage,
            destination: log.destination.clone(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a staff member.
    pub async fn put_staff(&self, staff: StaffRecord) {
        let mut tables = self.tables.write().await;
        tables.staff.retain(|s| s.id != staff.id);
        tables.staff.push(staff);
    }

    /// Add or replace a project.
    pub async fn put_project(&self, project: ProjectRecord) {
        let mut tables = self.tables.write().await;
        tables.projects.retain(|p| p.id != project.id);
        tables.projects.push(project);
    }

    /// Make reads of `table` fail (or succeed again).
    pub async fn set_unavailable(&self, table: Table, unavailable: bool) {
        let mut tables = self.tables.write().await;
        if unavailable {
            tables.unavailable.insert(table);
        } else {
            tables.unavailable.remove(&table);
        }
    }

    /// Number of stored task logs.
    pub async fn task_log_count(&self) -> usize {
        self.tables.read().await.task_logs.len()
    }
}

#[async_trait]
impl WorklogStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::TaskLogs)?;
        tables.check(Table::Projects)?;
        tables.check(Table::Staff)
    }

    async fn list_task_logs(&self, filter: &ReportFilter) -> Result<Vec<TaskLogView>, StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::TaskLogs)?;
        let mut logs: Vec<TaskLogView> = tables
            .task_logs
            .iter()
            .map(|log| tables.join(log))
            .filter(|view| filter.matches(view))
            .collect();
        logs.sort_by(|a, b| b.work_date.cmp(&a.work_date).then_with(|| a.id.cmp(&b.id)));
        Ok(logs)
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::Projects)?;
        let mut projects = tables.projects.clone();
        projects.sort_by(|a, b| a.project_number.cmp(&b.project_number));
        Ok(projects)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<ProjectRecord>, StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::Projects)?;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_staff(&self) -> Result<Vec<StaffRecord>, StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::Staff)?;
        let mut staff = tables.staff.clone();
        staff.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(staff)
    }

    async fn count_logs_by_employee(
        &self,
        window: &DateWindow,
    ) -> Result<HashMap<DbId, u64>, StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::TaskLogs)?;
        let mut counts: HashMap<DbId, u64> = HashMap::new();
        for log in tables.task_logs.iter().filter(|l| window.contains(l.work_date)) {
            *counts.entry(log.employee_id).or_default() += 1;
        }
        Ok(counts)
    }

    async fn distinct_work_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let tables = self.tables.read().await;
        tables.check(Table::TaskLogs)?;
        let dates: BTreeSet<NaiveDate> = tables.task_logs.iter().map(|l| l.work_date).collect();
        Ok(dates.into_iter().rev().collect())
    }

    async fn upsert_task_log(&self, input: &NewTaskLog) -> Result<Upserted, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(Table::TaskLogs)?;

        if !tables.staff.iter().any(|s| s.id == input.employee_id) {
            return Err(StoreError::UnknownReference {
                entity: "staff",
                id: input.employee_id,
            });
        }
        if !tables.projects.iter().any(|p| p.id == input.project_id) {
            return Err(StoreError::UnknownReference {
                entity: "project",
                id: input.project_id,
            });
        }

        let now = Utc::now();
        let existing = tables.task_logs.iter_mut().find(|l| {
            l.project_id == input.project_id
                && l.employee_id == input.employee_id
                && l.work_date == input.work_date
        });

        if let Some(row) = existing {
            apply(row, input);
            row.updated_at = now;
            return Ok(Upserted {
                log: row.clone(),
                created: false,
            });
        }

        tables.next_log_id += 1;
        let mut row = TaskLog {
            id: tables.next_log_id,
            employee_id: input.employee_id,
            project_id: input.project_id,
            work_date: input.work_date,
            stage: String::new(),
            task_type: String::new(),
            status: String::new(),
            description: None,
            project_hours: 0.0,
            travel_hours: 0.0,
            total_man_hours: 0.0,
            leaves_office: false,
            transport_mode: None,
            mileage: None,
            destination: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut row, input);
        tables.task_logs.push(row.clone());
        Ok(Upserted {
            log: row,
            created: true,
        })
    }
}

/// Copy the submitted values onto a stored row and recompute the total.
fn apply(row: &mut TaskLog, input: &NewTaskLog) {
    row.stage = input.stage.as_str().to_string();
    row.task_type = input.task_type.as_str().to_string();
    row.status = input.status.as_str().to_string();
    row.description = input.description.clone();
    row.project_hours = input.project_hours;
    row.travel_hours = input.travel_hours;
    row.total_man_hours = input.total_man_hours();
    row.leaves_office = input.leaves_office;
    row.transport_mode = input.transport_mode.map(|m| m.as_str().to_string());
    row.mileage = input.mileage;
    row.destination = input.destination.clone();
}
