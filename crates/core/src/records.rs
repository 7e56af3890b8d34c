//! Read-side records consumed by the report engine.
//!
//! Persistence backends convert their rows into these types; nothing in the
//! engine knows which store produced them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::assignment::Assignment;
use crate::taxonomy::EngineerType;
use crate::types::{DbId, Hours, Timestamp};

/// A task log joined with the engineer and project it references.
///
/// The joined fields are `None` when the referenced row no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskLogView {
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

impl TaskLogView {
    /// Project plus travel hours, recomputed from the components.
    pub fn man_hours(&self) -> Hours {
        self.project_hours + self.travel_hours
    }
}

/// A project from the project directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: DbId,
    pub project_number: String,
    pub project_name: String,
    pub project_type: Option<String>,
    pub stage: Option<String>,
    pub status: String,
    pub architect: Option<String>,
    pub assignment: Assignment,
    pub created_at: Timestamp,
}

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub engineer_type: Option<EngineerType>,
}
