//! Project-level reports: status/stage distribution and KPI totals.
//!
//! Both run over a [`ProjectScope`]. Without an engineer or date constraint
//! the scope is the whole project directory. With one, it is exactly the set
//! of projects touched by the matching task logs, so a date range always
//! means "projects worked on in that range" and never "projects created in it".

use std::collections::{BTreeSet, HashMap};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::filter::ReportFilter;
use crate::records::{ProjectRecord, TaskLogView};
use crate::taxonomy::{is_active_status, is_completed_status, is_stalled_status};
use crate::types::DbId;

/// Bucket label for a project with no value in the grouped column.
pub const NOT_SET: &str = "Not Set";

/// The projects a project-level report counts.
#[derive(Debug, Clone)]
pub struct ProjectScope<'a> {
    projects: Vec<&'a ProjectRecord>,
}

impl<'a> ProjectScope<'a> {
    /// Resolve the scope for `filter`. `logs` must be the logs matching it;
    /// they are ignored when the filter is not activity scoped.
    pub fn resolve(
        filter: &ReportFilter,
        projects: &'a [ProjectRecord],
        logs: &[TaskLogView],
    ) -> Self {
        if !filter.is_activity_scoped() {
            return Self::all(projects);
        }
        let touched: BTreeSet<DbId> = logs.iter().map(|log| log.project_id).collect();
        Self {
            projects: projects.iter().filter(|p| touched.contains(&p.id)).collect(),
        }
    }

    /// Every project in the directory.
    pub fn all(projects: &'a [ProjectRecord]) -> Self {
        Self {
            projects: projects.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ProjectRecord> + '_ {
        self.projects.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Project column a distribution groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Status,
    Stage,
}

impl Dimension {
    /// JSON key carrying the bucket label.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Status => "status",
            Dimension::Stage => "stage",
        }
    }

    fn value_of(self, project: &ProjectRecord) -> Option<&str> {
        match self {
            Dimension::Status => Some(project.status.as_str()),
            Dimension::Stage => project.stage.as_deref(),
        }
    }
}

/// One distribution bucket, serialized as `{"<dimension>": label, count, percentage}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub dimension: Dimension,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

impl Serialize for Share {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(self.dimension.key(), &self.label)?;
        map.serialize_entry("count", &self.count)?;
        map.serialize_entry("percentage", &self.percentage)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub data: Vec<Share>,
    pub total: usize,
}

/// `part / total * 100` rounded to one decimal; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Group the scoped projects by `dimension`, largest bucket first (ties by label).
pub fn project_distribution(scope: &ProjectScope<'_>, dimension: Dimension) -> Distribution {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for project in scope.iter() {
        let label = dimension
            .value_of(project)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_SET);
        *counts.entry(label.to_string()).or_default() += 1;
    }

    let total = scope.len();
    let mut data: Vec<Share> = counts
        .into_iter()
        .map(|(label, count)| Share {
            dimension,
            label,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    data.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    Distribution { data, total }
}

// ---------------------------------------------------------------------------
// KPI totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub stalled_projects: usize,
}

pub fn project_stats(scope: &ProjectScope<'_>) -> ProjectStats {
    let mut stats = ProjectStats {
        total_projects: scope.len(),
        ..ProjectStats::default()
    };
    for project in scope.iter() {
        if is_active_status(&project.status) {
            stats.active_projects += 1;
        } else if is_completed_status(&project.status) {
            stats.completed_projects += 1;
        } else if is_stalled_status(&project.status) {
            stats.stalled_projects += 1;
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
