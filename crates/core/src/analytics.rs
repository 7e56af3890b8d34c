//! Task-log aggregation.
//!
//! Every section is a pure function over logs that already satisfy a
//! [`ReportFilter`](crate::filter::ReportFilter). Sections never fail: an empty
//! input yields empty vectors and zeroed totals. Man-hours are always
//! recomputed from the project and travel components.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::records::{ProjectRecord, TaskLogView};
use crate::taxonomy::{is_open_status, TransportMode};
use crate::types::{DbId, Hours};

/// Placeholder for a joined value whose row no longer exists.
pub const UNKNOWN: &str = "Unknown";

/// Upper bound (inclusive) of open tasks for the `Low` tier.
pub const WORKLOAD_LOW_MAX: usize = 5;

/// Upper bound (inclusive) of open tasks for the `Medium` tier.
pub const WORKLOAD_MEDIUM_MAX: usize = 10;

fn or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn by_hours_desc(a: Hours, b: Hours) -> std::cmp::Ordering {
    b.total_cmp(&a)
}

// ---------------------------------------------------------------------------
// Hour totals
// ---------------------------------------------------------------------------

/// Summed hours over a group of logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursTotals {
    pub total_project_hours: Hours,
    pub total_travel_hours: Hours,
    pub total_man_hours: Hours,
    pub log_count: usize,
}

impl HoursTotals {
    fn add(&mut self, log: &TaskLogView) {
        self.total_project_hours += log.project_hours;
        self.total_travel_hours += log.travel_hours;
        self.total_man_hours += log.man_hours();
        self.log_count += 1;
    }
}

/// Grand totals over every log.
pub fn total_hours(logs: &[TaskLogView]) -> HoursTotals {
    let mut totals = HoursTotals::default();
    for log in logs {
        totals.add(log);
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHours {
    pub project_id: DbId,
    pub project_number: String,
    pub project_name: String,
    #[serde(flatten)]
    pub hours: HoursTotals,
}

/// Hours grouped by project, largest total first (ties by project number).
pub fn hours_by_project(logs: &[TaskLogView]) -> Vec<ProjectHours> {
    let mut groups: HashMap<DbId, ProjectHours> = HashMap::new();
    for log in logs {
        groups
            .entry(log.project_id)
            .or_insert_with(|| ProjectHours {
                project_id: log.project_id,
                project_number: or_unknown(log.project_number.as_deref()),
                project_name: or_unknown(log.project_name.as_deref()),
                hours: HoursTotals::default(),
            })
            .hours
            .add(log);
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        by_hours_desc(a.hours.total_man_hours, b.hours.total_man_hours)
            .then_with(|| a.project_number.cmp(&b.project_number))
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageHours {
    pub stage: String,
    #[serde(flatten)]
    pub hours: HoursTotals,
}

/// Hours grouped by the stage recorded on each log (not the project's
/// current stage), largest total first.
pub fn hours_by_stage(logs: &[TaskLogView]) -> Vec<StageHours> {
    let mut groups: HashMap<String, HoursTotals> = HashMap::new();
    for log in logs {
        groups
            .entry(or_unknown(Some(&log.stage)))
            .or_default()
            .add(log);
    }

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(stage, hours)| StageHours { stage, hours })
        .collect();
    rows.sort_by(|a, b| {
        by_hours_desc(a.hours.total_man_hours, b.hours.total_man_hours)
            .then_with(|| a.stage.cmp(&b.stage))
    });
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTypeHours {
    pub project_type: String,
    #[serde(flatten)]
    pub hours: HoursTotals,
}

/// Hours grouped by the joined project type, largest total first.
pub fn hours_by_project_type(logs: &[TaskLogView]) -> Vec<ProjectTypeHours> {
    let mut groups: HashMap<String, HoursTotals> = HashMap::new();
    for log in logs {
        groups
            .entry(or_unknown(log.project_type.as_deref()))
            .or_default()
            .add(log);
    }

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(project_type, hours)| ProjectTypeHours {
            project_type,
            hours,
        })
        .collect();
    rows.sort_by(|a, b| {
        by_hours_desc(a.hours.total_man_hours, b.hours.total_man_hours)
            .then_with(|| a.project_type.cmp(&b.project_type))
    });
    rows
}

// ---------------------------------------------------------------------------
// Engineer utilization
// ---------------------------------------------------------------------------

/// Classification of an engineer's open-task count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkloadTier {
    Low,
    Medium,
    High,
}

impl WorkloadTier {
    pub fn from_open_tasks(open_tasks: usize) -> Self {
        if open_tasks <= WORKLOAD_LOW_MAX {
            WorkloadTier::Low
        } else if open_tasks <= WORKLOAD_MEDIUM_MAX {
            WorkloadTier::Medium
        } else {
            WorkloadTier::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerUtilization {
    pub employee_id: DbId,
    pub name: String,
    pub email: String,
    pub total_man_hours: Hours,
    pub log_count: usize,
    pub project_count: usize,
    pub open_tasks: usize,
    /// Open tasks whose work date is before `today`. Logs carry no due date,
    /// so this is a staleness signal only.
    pub overdue_tasks: usize,
    pub workload: WorkloadTier,
}

/// Per-engineer workload, busiest first (ties by name).
pub fn utilization_by_engineer(logs: &[TaskLogView], today: NaiveDate) -> Vec<EngineerUtilization> {
    struct Acc {
        name: String,
        email: String,
        hours: Hours,
        logs: usize,
        projects: BTreeSet<DbId>,
        open: usize,
        overdue: usize,
    }

    let mut groups: HashMap<DbId, Acc> = HashMap::new();
    for log in logs {
        let acc = groups.entry(log.employee_id).or_insert_with(|| Acc {
            name: or_unknown(log.employee_name.as_deref()),
            email: log.employee_email.clone().unwrap_or_default(),
            hours: 0.0,
            logs: 0,
            projects: BTreeSet::new(),
            open: 0,
            overdue: 0,
        });
        acc.hours += log.man_hours();
        acc.logs += 1;
        acc.projects.insert(log.project_id);
        if is_open_status(&log.status) {
            acc.open += 1;
            if log.work_date < today {
                acc.overdue += 1;
            }
        }
    }

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(employee_id, acc)| EngineerUtilization {
            employee_id,
            name: acc.name,
            email: acc.email,
            total_man_hours: acc.hours,
            log_count: acc.logs,
            project_count: acc.projects.len(),
            open_tasks: acc.open,
            overdue_tasks: acc.overdue,
            workload: WorkloadTier::from_open_tasks(acc.open),
        })
        .collect();
    rows.sort_by(|a, b| {
        by_hours_desc(a.total_man_hours, b.total_man_hours)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    rows
}

// ---------------------------------------------------------------------------
// Employee / project progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProjectProgress {
    pub employee_id: DbId,
    pub employee_name: String,
    pub project_id: DbId,
    pub project_number: String,
    pub project_name: String,
    pub total_man_hours: Hours,
    pub log_count: usize,
    pub last_work_date: Option<NaiveDate>,
    /// Whether the project's assignment includes the employee.
    pub assigned: bool,
}

/// Hours per (employee, project) pair.
///
/// Projects assigned to an employee who appears in `logs` but which the
/// employee has not logged against are listed with zero hours.
pub fn employee_project_progress(
    logs: &[TaskLogView],
    projects: &[ProjectRecord],
) -> Vec<EmployeeProjectProgress> {
    let directory: HashMap<DbId, &ProjectRecord> = projects.iter().map(|p| (p.id, p)).collect();
    let assigned_to = |employee_id: DbId, project_id: DbId| {
        directory
            .get(&project_id)
            .is_some_and(|p| p.assignment.includes(employee_id))
    };

    let mut pairs: HashMap<(DbId, DbId), EmployeeProjectProgress> = HashMap::new();
    let mut employees: HashMap<DbId, String> = HashMap::new();
    for log in logs {
        employees
            .entry(log.employee_id)
            .or_insert_with(|| or_unknown(log.employee_name.as_deref()));
        let row = pairs
            .entry((log.employee_id, log.project_id))
            .or_insert_with(|| EmployeeProjectProgress {
                employee_id: log.employee_id,
                employee_name: or_unknown(log.employee_name.as_deref()),
                project_id: log.project_id,
                project_number: or_unknown(log.project_number.as_deref()),
                project_name: or_unknown(log.project_name.as_deref()),
                total_man_hours: 0.0,
                log_count: 0,
                last_work_date: None,
                assigned: assigned_to(log.employee_id, log.project_id),
            });
        row.total_man_hours += log.man_hours();
        row.log_count += 1;
        row.last_work_date = row.last_work_date.max(Some(log.work_date));
    }

    for (employee_id, employee_name) in &employees {
        for project in projects {
            if project.assignment.includes(*employee_id) {
                pairs
                    .entry((*employee_id, project.id))
                    .or_insert_with(|| EmployeeProjectProgress {
                        employee_id: *employee_id,
                        employee_name: employee_name.clone(),
                        project_id: project.id,
                        project_number: project.project_number.clone(),
                        project_name: project.project_name.clone(),
                        total_man_hours: 0.0,
                        log_count: 0,
                        last_work_date: None,
                        assigned: true,
                    });
            }
        }
    }

    let mut rows: Vec<_> = pairs.into_values().collect();
    rows.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
            .then_with(|| by_hours_desc(a.total_man_hours, b.total_man_hours))
            .then_with(|| a.project_number.cmp(&b.project_number))
    });
    rows
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

fn travelling(logs: &[TaskLogView]) -> impl Iterator<Item = &TaskLogView> {
    logs.iter().filter(|log| log.leaves_office)
}

fn mode_of(log: &TaskLogView) -> Option<TransportMode> {
    log.transport_mode.as_deref().and_then(TransportMode::parse)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportByProject {
    pub project_id: DbId,
    pub project_number: String,
    pub project_name: String,
    pub total_mileage: f64,
    pub total_travel_hours: Hours,
    pub road_trips: usize,
    pub flight_trips: usize,
    pub other_trips: usize,
    pub trips: usize,
}

/// Out-of-office travel per project, most trips first.
pub fn transport_by_project(logs: &[TaskLogView]) -> Vec<TransportByProject> {
    let mut groups: HashMap<DbId, TransportByProject> = HashMap::new();
    for log in travelling(logs) {
        let row = groups
            .entry(log.project_id)
            .or_insert_with(|| TransportByProject {
                project_id: log.project_id,
                project_number: or_unknown(log.project_number.as_deref()),
                project_name: or_unknown(log.project_name.as_deref()),
                total_mileage: 0.0,
                total_travel_hours: 0.0,
                road_trips: 0,
                flight_trips: 0,
                other_trips: 0,
                trips: 0,
            });
        row.total_mileage += log.mileage.unwrap_or(0.0);
        row.total_travel_hours += log.travel_hours;
        row.trips += 1;
        match mode_of(log) {
            Some(TransportMode::Road) => row.road_trips += 1,
            Some(TransportMode::Flight) => row.flight_trips += 1,
            Some(TransportMode::Other) => row.other_trips += 1,
            None => {}
        }
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.trips
            .cmp(&a.trips)
            .then_with(|| a.project_number.cmp(&b.project_number))
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeMileage {
    pub employee_id: DbId,
    pub name: String,
    pub total_mileage: f64,
    pub total_travel_hours: Hours,
    pub trips: usize,
}

/// Road mileage per employee, highest mileage first.
pub fn mileage_by_employee(logs: &[TaskLogView]) -> Vec<EmployeeMileage> {
    let mut groups: HashMap<DbId, EmployeeMileage> = HashMap::new();
    for log in travelling(logs).filter(|log| mode_of(log) == Some(TransportMode::Road)) {
        let row = groups
            .entry(log.employee_id)
            .or_insert_with(|| EmployeeMileage {
                employee_id: log.employee_id,
                name: or_unknown(log.employee_name.as_deref()),
                total_mileage: 0.0,
                total_travel_hours: 0.0,
                trips: 0,
            });
        row.total_mileage += log.mileage.unwrap_or(0.0);
        row.total_travel_hours += log.travel_hours;
        row.trips += 1;
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_mileage
            .total_cmp(&a.total_mileage)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDestination {
    pub destination: String,
    pub trip_count: usize,
    pub total_travel_hours: Hours,
}

/// Flight destinations, most visited first.
pub fn flight_destinations(logs: &[TaskLogView]) -> Vec<FlightDestination> {
    let mut groups: HashMap<String, FlightDestination> = HashMap::new();
    for log in travelling(logs).filter(|log| mode_of(log) == Some(TransportMode::Flight)) {
        let destination = or_unknown(log.destination.as_deref());
        let row = groups
            .entry(destination.clone())
            .or_insert_with(|| FlightDestination {
                destination,
                trip_count: 0,
                total_travel_hours: 0.0,
            });
        row.trip_count += 1;
        row.total_travel_hours += log.travel_hours;
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.trip_count
            .cmp(&a.trip_count)
            .then_with(|| a.destination.cmp(&b.destination))
    });
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportModeShare {
    pub mode: String,
    pub count: usize,
    pub total_mileage: f64,
    pub total_travel_hours: Hours,
}

/// Out-of-office logs grouped by transport mode, most used first.
pub fn transport_mode_dist(logs: &[TaskLogView]) -> Vec<TransportModeShare> {
    let mut groups: HashMap<String, TransportModeShare> = HashMap::new();
    for log in travelling(logs) {
        let mode = mode_of(log)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| or_unknown(log.transport_mode.as_deref()));
        let row = groups
            .entry(mode.clone())
            .or_insert_with(|| TransportModeShare {
                mode,
                count: 0,
                total_mileage: 0.0,
                total_travel_hours: 0.0,
            });
        row.count += 1;
        row.total_mileage += log.mileage.unwrap_or(0.0);
        row.total_travel_hours += log.travel_hours;
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.mode.cmp(&b.mode)));
    rows
}

/// Trip counts for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTransport {
    /// `"Jan 2026"`.
    pub month: String,
    #[serde(rename = "Road")]
    pub road: usize,
    #[serde(rename = "Flight")]
    pub flight: usize,
    #[serde(rename = "Other")]
    pub other: usize,
}

/// Monthly trip counts for `year`. Always twelve buckets, January first;
/// months without travel are zero.
pub fn transport_trend_by_month(logs: &[TaskLogView], year: i32) -> Vec<MonthlyTransport> {
    let mut buckets: Vec<MonthlyTransport> = (1..=12)
        .map(|month| MonthlyTransport {
            month: month_label(year, month),
            road: 0,
            flight: 0,
            other: 0,
        })
        .collect();

    for log in travelling(logs).filter(|log| log.work_date.year() == year) {
        let bucket = &mut buckets[log.work_date.month0() as usize];
        match mode_of(log) {
            Some(TransportMode::Road) => bucket.road += 1,
            Some(TransportMode::Flight) => bucket.flight += 1,
            Some(TransportMode::Other) => bucket.other += 1,
            None => {}
        }
    }
    buckets
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{month:02} {year}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
