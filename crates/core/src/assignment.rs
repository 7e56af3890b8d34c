//! Project staff assignment.
//!
//! Projects have been written by three generations of the portal: a single
//! `assigned_to` reference, an `assigned_staff` array, and the current
//! electrical / mechanical / lead split. [`Assignment`] folds all three into
//! one tagged union so callers only ever ask [`Assignment::includes`].

use serde::Serialize;

use crate::types::DbId;

/// Who is associated with a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Assignment {
    Unassigned,
    #[serde(rename_all = "camelCase")]
    Single { staff_id: DbId },
    #[serde(rename_all = "camelCase")]
    Many { staff_ids: Vec<DbId> },
    #[serde(rename_all = "camelCase")]
    RoleSplit {
        electrical: Option<DbId>,
        mechanical: Option<DbId>,
        lead: Option<DbId>,
    },
}

impl Assignment {
    /// Resolve the stored columns into a single shape.
    ///
    /// Precedence follows the schema history: role-split columns win over the
    /// array, which wins over the legacy single reference.
    pub fn from_columns(
        assigned_to: Option<DbId>,
        assigned_staff: &[DbId],
        electrical: Option<DbId>,
        mechanical: Option<DbId>,
        lead: Option<DbId>,
    ) -> Self {
        if electrical.is_some() || mechanical.is_some() || lead.is_some() {
            return Assignment::RoleSplit {
                electrical,
                mechanical,
                lead,
            };
        }
        if !assigned_staff.is_empty() {
            let mut staff_ids = assigned_staff.to_vec();
            staff_ids.sort_unstable();
            staff_ids.dedup();
            return Assignment::Many { staff_ids };
        }
        match assigned_to {
            Some(staff_id) => Assignment::Single { staff_id },
            None => Assignment::Unassigned,
        }
    }

    /// Whether `staff_id` is associated with the project in any role.
    pub fn includes(&self, staff_id: DbId) -> bool {
        match self {
            Assignment::Unassigned => false,
            Assignment::Single { staff_id: id } => *id == staff_id,
            Assignment::Many { staff_ids } => staff_ids.contains(&staff_id),
            Assignment::RoleSplit {
                electrical,
                mechanical,
                lead,
            } => [electrical, mechanical, lead]
                .into_iter()
                .any(|slot| *slot == Some(staff_id)),
        }
    }
}
