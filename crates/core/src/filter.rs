//! Report filter builder.
//!
//! [`ReportQuery`] is the raw, untrusted query string. [`ReportQuery::build`]
//! validates it into an immutable [`ReportFilter`], which is the only filter
//! representation the stores and the report engine accept. Empty parameters
//! impose no constraint; malformed ones are rejected with the offending field
//! named, before any store is touched.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::error::CoreError;
use crate::records::TaskLogView;
use crate::taxonomy::{Stage, TaskType, WorkStatus};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Raw query
// ---------------------------------------------------------------------------

/// Filter parameters as they arrive on the query string.
///
/// The master schedule historically sends `taskStage` / `taskType` while the
/// analytics view sends `stage` / `task`; both spellings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub engineer_id: Option<String>,
    pub project_id: Option<String>,
    #[serde(alias = "taskStage")]
    pub stage: Option<String>,
    #[serde(alias = "task")]
    pub task_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportQuery {
    /// Validate and normalize into a [`ReportFilter`].
    pub fn build(&self) -> Result<ReportFilter, CoreError> {
        let engineer_id = present(&self.engineer_id)
            .map(|raw| parse_id("engineerId", raw))
            .transpose()?;
        let project_id = present(&self.project_id)
            .map(|raw| parse_id("projectId", raw))
            .transpose()?;
        let stage = present(&self.stage)
            .map(|raw| Stage::parse_field("stage", raw))
            .transpose()?;
        let task_type = present(&self.task_type)
            .map(|raw| TaskType::parse_field("taskType", raw))
            .transpose()?;
        let status = present(&self.status)
            .map(|raw| WorkStatus::parse_field("status", raw))
            .transpose()?;
        let start = present(&self.start_date)
            .map(|raw| parse_date("startDate", raw))
            .transpose()?;
        let end = present(&self.end_date)
            .map(|raw| parse_date("endDate", raw))
            .transpose()?;

        Ok(ReportFilter {
            engineer_id,
            project_id,
            stage,
            task_type,
            status,
            window: DateWindow::from_dates(start, end)?,
        })
    }
}

/// Parameters accepted by the project-level reports (distribution and KPI
/// totals). Only the engineer and the date range narrow the project scope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub engineer_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ScopeQuery {
    pub fn build(&self) -> Result<ReportFilter, CoreError> {
        ReportQuery {
            engineer_id: self.engineer_id.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            ..ReportQuery::default()
        }
        .build()
    }
}

// ---------------------------------------------------------------------------
// Validated filter
// ---------------------------------------------------------------------------

/// A validated, immutable task-log filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub engineer_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub stage: Option<Stage>,
    pub task_type: Option<TaskType>,
    pub status: Option<WorkStatus>,
    pub window: DateWindow,
}

impl ReportFilter {
    /// A filter that matches every task log.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter restricted to one engineer's logs inside `window`.
    pub fn for_engineer(engineer_id: DbId, window: DateWindow) -> Self {
        Self {
            engineer_id: Some(engineer_id),
            window,
            ..Self::default()
        }
    }

    /// Whether a joined task log satisfies every constraint.
    ///
    /// Stores that cannot push the filter down apply this predicate; the SQL
    /// rendering in the Postgres store encodes the same rules.
    pub fn matches(&self, log: &TaskLogView) -> bool {
        self.engineer_id.map_or(true, |id| log.employee_id == id)
            && self.project_id.map_or(true, |id| log.project_id == id)
            && self
                .stage
                .map_or(true, |s| s.spellings().contains(&log.stage.as_str()))
            && self
                .task_type
                .map_or(true, |t| t.spellings().contains(&log.task_type.as_str()))
            && self
                .status
                .map_or(true, |s| s.spellings().contains(&log.status.as_str()))
            && self.window.contains(log.work_date)
    }

    /// Whether the filter narrows by who did the work or when.
    ///
    /// Project-level reports switch from the whole directory to the set of
    /// projects touched by matching logs when this is true.
    pub fn is_activity_scoped(&self) -> bool {
        self.engineer_id.is_some() || self.window.is_bounded()
    }

    /// Whether no constraint at all is set.
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

/// Inclusive work-date bounds. The start is normalized to 00:00:00 and the
/// end to 23:59:59 of their calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    /// Build a window from calendar days, rejecting an inverted range.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, CoreError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::invalid_field(
                    "endDate",
                    format!("{e} is before startDate {s}"),
                ));
            }
        }
        Ok(Self {
            start: start.map(start_of_day),
            end: end.map(end_of_day),
        })
    }

    /// A window spanning whole days `start..=end`.
    pub fn days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start_of_day(start)),
            end: Some(end_of_day(end)),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether a work date (taken at 00:00:00) falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = start_of_day(date);
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }

    /// First calendar day included, if bounded below.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|s| s.date())
    }

    /// Last calendar day included, if bounded above.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.map(|e| e.date())
    }
}

/// 00:00:00 of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Trimmed value, or `None` when absent or blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a reference id. Ids are positive integers.
pub fn parse_id(field: &str, raw: &str) -> Result<DbId, CoreError> {
    raw.trim()
        .parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::invalid_field(field, format!("'{raw}' is not a valid id")))
}

/// Parse a calendar date. Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS`
/// timestamp (as the week endpoints emit) or an RFC 3339 timestamp; for the
/// timestamp forms only the date part is used. Years are limited to
/// `1..=9999`.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ts| ts.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()));

    match parsed {
        Some(date) if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) => Ok(date),
        Some(date) => Err(CoreError::invalid_field(
            field,
            format!("year {} is out of range ({MIN_YEAR}-{MAX_YEAR})", date.year()),
        )),
        None => Err(CoreError::invalid_field(
            field,
            format!("'{raw}' is not a date (expected YYYY-MM-DD)"),
        )),
    }
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(employee_id: DbId, project_id: DbId, work_date: NaiveDate) -> TaskLogView {
        TaskLogView {
            id: 1,
            employee_id,
            employee_name: None,
            employee_email: None,
            project_id,
            project_number: None,
            project_name: None,
            project_type: None,
            architect: None,
            work_date,
            stage: "Design".into(),
            task_type: "Inspection".into(),
            status: "Active".into(),
            description: None,
            project_hours: 1.0,
            travel_hours: 0.0,
            leaves_office: false,
            transport_mode: None,
            mileage: None,
            destination: None,
        }
    }

    fn field_of(err: CoreError) -> String {
        match err {
            CoreError::InvalidField { field, .. } => field,
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn empty_query_builds_open_filter() {
        let filter = ReportQuery::default().build().unwrap();
        assert!(filter.is_unfiltered());
        assert!(!filter.is_activity_scoped());
        assert!(filter.matches(&log(1, 2, date(2026, 1, 5))));
    }

    #[test]
    fn blank_values_impose_no_constraint() {
        let query = ReportQuery {
            engineer_id: Some("   ".into()),
            stage: Some(String::new()),
            start_date: Some("".into()),
            ..Default::default()
        };
        assert!(query.build().unwrap().is_unfiltered());
    }

    #[test]
    fn malformed_ids_are_rejected_with_field_name() {
        let query = ReportQuery {
            engineer_id: Some("64f0c2a9e1".into()),
            ..Default::default()
        };
        assert_eq!(field_of(query.build().unwrap_err()), "engineerId");

        let query = ReportQuery {
            project_id: Some("0".into()),
            ..Default::default()
        };
        assert_eq!(field_of(query.build().unwrap_err()), "projectId");
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let query = ReportQuery {
            stage: Some("Demolition".into()),
            ..Default::default()
        };
        assert_eq!(field_of(query.build().unwrap_err()), "stage");
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let query = ReportQuery {
            start_date: Some("2026-03-10".into()),
            end_date: Some("2026-03-01".into()),
            ..Default::default()
        };
        assert_eq!(field_of(query.build().unwrap_err()), "endDate");
    }

    #[test]
    fn unparsable_date_is_rejected() {
        let query = ReportQuery {
            start_date: Some("10/03/2026".into()),
            ..Default::default()
        };
        assert_eq!(field_of(query.build().unwrap_err()), "startDate");
    }

    #[test]
    fn naive_timestamps_use_their_date_part() {
        assert_eq!(parse_date("weekStart", "2026-02-16T00:00:00").unwrap(), date(2026, 2, 16));
        assert_eq!(parse_date("weekEnd", "2026-02-22T23:59:59").unwrap(), date(2026, 2, 22));
        assert_eq!(parse_date("weekEnd", "2026-02-22T23:59:59.999").unwrap(), date(2026, 2, 22));
    }

    #[test]
    fn out_of_range_years_are_rejected() {
        assert_matches!(
            parse_date("weekStart", "+262142-12-31"),
            Err(CoreError::InvalidField { ref field, .. }) if field == "weekStart"
        );
        assert_matches!(
            parse_date("startDate", "10000-01-01"),
            Err(CoreError::InvalidField { .. })
        );
        assert_eq!(parse_date("startDate", "9999-12-31").unwrap(), date(9999, 12, 31));
    }

    #[test]
    fn date_bounds_are_normalized_to_whole_days() {
        let query = ReportQuery {
            start_date: Some("2026-03-02".into()),
            end_date: Some("2026-03-08T10:15:00Z".into()),
            ..Default::default()
        };
        let filter = query.build().unwrap();
        assert_eq!(
            filter.window.start,
            date(2026, 3, 2).and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            filter.window.end,
            date(2026, 3, 8).and_hms_opt(23, 59, 59)
        );
        assert!(filter.is_activity_scoped());
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let window = DateWindow::days(date(2026, 3, 2), date(2026, 3, 8));
        assert!(window.contains(date(2026, 3, 2)));
        assert!(window.contains(date(2026, 3, 8)));
        assert!(!window.contains(date(2026, 3, 1)));
        assert!(!window.contains(date(2026, 3, 9)));
    }

    #[test]
    fn matches_applies_every_constraint() {
        let filter = ReportQuery {
            engineer_id: Some("1".into()),
            project_id: Some("2".into()),
            stage: Some("Design".into()),
            task_type: Some("Inspection".into()),
            status: Some("Active".into()),
            start_date: Some("2026-01-01".into()),
            end_date: Some("2026-01-31".into()),
        }
        .build()
        .unwrap();

        assert!(filter.matches(&log(1, 2, date(2026, 1, 15))));
        assert!(!filter.matches(&log(3, 2, date(2026, 1, 15))));
        assert!(!filter.matches(&log(1, 9, date(2026, 1, 15))));
        assert!(!filter.matches(&log(1, 2, date(2026, 2, 1))));

        let mut other_stage = log(1, 2, date(2026, 1, 15));
        other_stage.stage = "Tendering".into();
        assert!(!filter.matches(&other_stage));
    }

    #[test]
    fn stage_filter_matches_legacy_spelling() {
        let filter = ReportQuery {
            stage: Some("Pre-Design".into()),
            ..Default::default()
        }
        .build()
        .unwrap();
        let mut row = log(1, 2, date(2026, 1, 15));
        row.stage = "Pre-design".into();
        assert!(filter.matches(&row));
    }

    #[test]
    fn scope_query_only_narrows_by_engineer_and_dates() {
        let filter = ScopeQuery {
            engineer_id: Some("4".into()),
            start_date: None,
            end_date: Some("2026-02-28".into()),
        }
        .build()
        .unwrap();
        assert_eq!(filter.engineer_id, Some(4));
        assert_eq!(filter.stage, None);
        assert_eq!(filter.window.end_date(), Some(date(2026, 2, 28)));
        assert!(filter.is_activity_scoped());
    }

    #[test]
    fn from_dates_accepts_open_ends() {
        let window = DateWindow::from_dates(Some(date(2026, 1, 1)), None).unwrap();
        assert!(window.is_bounded());
        assert!(window.contains(date(2030, 1, 1)));
        assert_matches!(window.end, None);
    }
}
