//! Weekly submission compliance.
//!
//! Weeks run Monday 00:00:00 to Sunday 23:59:59. A staff member has
//! submitted for a week when they have at least one task log dated inside it.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::CoreError;
use crate::filter::{end_of_day, parse_date, start_of_day, DateWindow};
use crate::projects::round1;
use crate::records::StaffRecord;
use crate::roles::ROLE_STAFF;
use crate::taxonomy::EngineerType;
use crate::types::DbId;

/// Monday of the week containing `date`.
///
/// With Sunday numbered 0, Monday is `date - ((dow + 6) % 7)` days, so a
/// Sunday rolls back six days.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let dow = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days((dow + 6) % 7)
}

/// A reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// The Monday-to-Sunday week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = week_start(date);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Resolve `weekStart` / `weekEnd` query values.
    ///
    /// `weekStart` defaults to the week containing `today` and is normalized
    /// to its Monday. `weekEnd` defaults to the following Sunday and may not
    /// precede the start.
    pub fn from_query(
        week_start_raw: Option<&str>,
        week_end_raw: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        let week_start_raw = week_start_raw.map(str::trim).filter(|v| !v.is_empty());
        let week_end_raw = week_end_raw.map(str::trim).filter(|v| !v.is_empty());

        let anchor = match week_start_raw {
            Some(raw) => parse_date("weekStart", raw)?,
            None => today,
        };
        let mut window = Self::containing(anchor);

        if let Some(raw) = week_end_raw {
            let end = parse_date("weekEnd", raw)?;
            if end < window.start {
                return Err(CoreError::invalid_field(
                    "weekEnd",
                    format!("{end} is before weekStart {}", window.start),
                ));
            }
            window.end = end;
        }
        Ok(window)
    }

    pub fn start_at(&self) -> NaiveDateTime {
        start_of_day(self.start)
    }

    pub fn end_at(&self) -> NaiveDateTime {
        end_of_day(self.end)
    }

    /// `"9 Feb 2026 - 15 Feb 2026"`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%-d %b %Y"),
            self.end.format("%-d %b %Y")
        )
    }

    /// The same bounds as a task-log date filter.
    pub fn date_window(&self) -> DateWindow {
        DateWindow::days(self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffWeekCount {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub engineer_type: Option<EngineerType>,
    pub task_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub total_staff: usize,
    pub submitted: usize,
    pub not_submitted: usize,
    pub submission_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySubmissionReport {
    pub week_start: NaiveDateTime,
    pub week_end: NaiveDateTime,
    pub label: String,
    pub summary: SubmissionSummary,
    pub submitted_users: Vec<StaffWeekCount>,
    pub not_submitted_users: Vec<StaffWeekCount>,
    pub all_employees_with_task_counts: Vec<StaffWeekCount>,
}

/// Build the compliance report for `window`.
///
/// `staff` is the whole directory; only members with the `staff` role are
/// enumerated. `counts` maps employee id to the number of logs inside the
/// window; missing ids count as zero.
pub fn weekly_submission_report(
    window: WeekWindow,
    staff: &[StaffRecord],
    counts: &HashMap<DbId, u64>,
) -> WeeklySubmissionReport {
    let mut everyone: Vec<StaffWeekCount> = staff
        .iter()
        .filter(|s| s.role == ROLE_STAFF)
        .map(|s| StaffWeekCount {
            id: s.id,
            name: s.name.clone(),
            email: s.email.clone(),
            engineer_type: s.engineer_type,
            task_count: counts.get(&s.id).copied().unwrap_or(0),
        })
        .collect();

    let (mut submitted, mut not_submitted): (Vec<_>, Vec<_>) =
        everyone.iter().cloned().partition(|s| s.task_count > 0);
    submitted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    not_submitted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    everyone.sort_by(|a, b| {
        b.task_count
            .cmp(&a.task_count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let total_staff = everyone.len();
    let summary = SubmissionSummary {
        total_staff,
        submitted: submitted.len(),
        not_submitted: not_submitted.len(),
        submission_rate: submission_rate(submitted.len(), total_staff),
    };

    WeeklySubmissionReport {
        week_start: window.start_at(),
        week_end: window.end_at(),
        label: window.label(),
        summary,
        submitted_users: submitted,
        not_submitted_users: not_submitted,
        all_employees_with_task_counts: everyone,
    }
}

/// `submitted / total * 100` to one decimal; 0 with no staff.
pub fn submission_rate(submitted: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(submitted as f64 / total as f64 * 100.0)
}

// ---------------------------------------------------------------------------
// Available weeks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableWeek {
    pub week_start: NaiveDateTime,
    pub week_end: NaiveDateTime,
    pub label: String,
}

impl From<WeekWindow> for AvailableWeek {
    fn from(window: WeekWindow) -> Self {
        Self {
            week_start: window.start_at(),
            week_end: window.end_at(),
            label: window.label(),
        }
    }
}

/// Distinct weeks that contain at least one of `work_dates`, most recent first.
pub fn available_weeks<I>(work_dates: I) -> Vec<AvailableWeek>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mondays: BTreeSet<NaiveDate> = work_dates.into_iter().map(week_start).collect();
    mondays
        .into_iter()
        .rev()
        .map(|monday| WeekWindow::containing(monday).into())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
