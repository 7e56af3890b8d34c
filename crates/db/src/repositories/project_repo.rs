//! Repository for the `projects` table.

use sqlx::PgPool;
use worklog_core::types::DbId;

use crate::models::project::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, project_number, project_name, project_type, stage, status, architect, \
    assigned_to, assigned_staff, electrical_id, mechanical_id, lead_id, created_at";

/// Read access to the project directory.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by project number.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY project_number");
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }
}
