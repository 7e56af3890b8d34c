//! Staff row model.

use sqlx::FromRow;
use worklog_core::records::StaffRecord;
use worklog_core::taxonomy::EngineerType;
use worklog_core::types::{DbId, Timestamp};

/// A row from the `staff` table.
#[derive(Debug, Clone, FromRow)]
pub struct StaffRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub engineer_type: Option<String>,
    pub created_at: Timestamp,
}

impl From<StaffRow> for StaffRecord {
    fn from(row: StaffRow) -> Self {
        StaffRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            engineer_type: row.engineer_type.as_deref().and_then(EngineerType::parse),
        }
    }
}
