//! Repository for the `staff` table.

use sqlx::PgPool;

use crate::models::staff::StaffRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, role, engineer_type, created_at";

/// Read access to the staff directory.
pub struct StaffRepo;

impl StaffRepo {
    /// List every staff member ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<StaffRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff ORDER BY name, id");
        sqlx::query_as::<_, StaffRow>(&query).fetch_all(pool).await
    }
}
