//! Project row model.

use sqlx::FromRow;
use worklog_core::assignment::Assignment;
use worklog_core::records::ProjectRecord;
use worklog_core::types::{DbId, Timestamp};

/// A row from the `projects` table, with every generation of assignment
/// column still present.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub project_number: String,
    pub project_name: String,
    pub project_type: Option<String>,
    pub stage: Option<String>,
    pub status: String,
    pub architect: Option<String>,
    pub assigned_to: Option<DbId>,
    pub assigned_staff: Vec<DbId>,
    pub electrical_id: Option<DbId>,
    pub mechanical_id: Option<DbId>,
    pub lead_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        let assignment = Assignment::from_columns(
            row.assigned_to,
            &row.assigned_staff,
            row.electrical_id,
            row.mechanical_id,
            row.lead_id,
        );
        ProjectRecord {
            id: row.id,
            project_number: row.project_number,
            project_name: row.project_name,
            project_type: row.project_type,
            stage: row.stage,
            status: row.status,
            architect: row.architect,
            assignment,
            created_at: row.created_at,
        }
    }
}
