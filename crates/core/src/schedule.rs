//! Master schedule: the flattened, filterable list of task logs.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::records::TaskLogView;
use crate::types::{DbId, Hours};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub id: DbId,
    pub employee_id: DbId,
    pub engineer_name: Option<String>,
    pub work_date: NaiveDate,
    /// Weekday name of `work_date`, e.g. `"Monday"`.
    pub day: String,
    pub project_id: DbId,
    pub project_number: Option<String>,
    pub project_name: Option<String>,
    pub architect: Option<String>,
    pub stage: String,
    pub task_type: String,
    pub description: Option<String>,
    pub project_hours: Hours,
    pub travel_hours: Hours,
    pub total_man_hours: Hours,
    pub status: String,
    pub leaves_office: bool,
    pub transport_mode: Option<String>,
    pub mileage: Option<f64>,
    pub destination: Option<String>,
}

impl From<TaskLogView> for ScheduleRow {
    fn from(log: TaskLogView) -> Self {
        let total_man_hours = log.man_hours();
        Self {
            id: log.id,
            employee_id: log.employee_id,
            engineer_name: log.employee_name,
            work_date: log.work_date,
            day: weekday_name(log.work_date).to_string(),
            project_id: log.project_id,
            project_number: log.project_number,
            project_name: log.project_name,
            architect: log.architect,
            stage: log.stage,
            task_type: log.task_type,
            description: log.description,
            project_hours: log.project_hours,
            travel_hours: log.travel_hours,
            total_man_hours,
            status: log.status,
            leaves_office: log.leaves_office,
            transport_mode: log.transport_mode,
            mileage: log.mileage,
            destination: log.destination,
        }
    }
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

/// Schedule rows, most recent work date first; same-day rows are ordered by
/// engineer name, then project number.
pub fn master_schedule(logs: Vec<TaskLogView>) -> Vec<ScheduleRow> {
    let mut rows: Vec<ScheduleRow> = logs.into_iter().map(ScheduleRow::from).collect();
    rows.sort_by(|a, b| {
        b.work_date
            .cmp(&a.work_date)
            .then_with(|| a.engineer_name.cmp(&b.engineer_name))
            .then_with(|| a.project_number.cmp(&b.project_number))
            .then_with(|| a.id.cmp(&b.id))
    });
    rows
}
