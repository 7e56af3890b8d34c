//! Analytics response assembly.
//!
//! The analytics view is a fixed set of named sections computed from two
//! inputs: the filtered task logs and the project directory. Either input may
//! be unavailable; sections that depend on a missing input are left out and
//! named in `omittedSections` while the rest are still returned.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{
    employee_project_progress, flight_destinations, hours_by_project, hours_by_project_type,
    hours_by_stage, mileage_by_employee, total_hours, transport_by_project, transport_mode_dist,
    transport_trend_by_month, utilization_by_engineer, EmployeeMileage, EmployeeProjectProgress,
    EngineerUtilization, FlightDestination, HoursTotals, MonthlyTransport, ProjectHours,
    ProjectTypeHours, StageHours, TransportByProject, TransportModeShare,
};
use crate::filter::ReportFilter;
use crate::projects::{project_distribution, Dimension, Distribution, ProjectScope};
use crate::records::{ProjectRecord, TaskLogView};

/// Named analytics sections, in response order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    HoursByProject,
    UtilizationByEngineer,
    ProjectStatusDist,
    HoursByStage,
    HoursByProjectType,
    EmployeeProjectProgress,
    TransportByProject,
    MileageByEmployee,
    FlightDestinations,
    TransportModeDist,
    TransportTrendByMonth,
    TotalHours,
}

impl Section {
    pub const ALL: [Section; 12] = [
        Section::HoursByProject,
        Section::UtilizationByEngineer,
        Section::ProjectStatusDist,
        Section::HoursByStage,
        Section::HoursByProjectType,
        Section::EmployeeProjectProgress,
        Section::TransportByProject,
        Section::MileageByEmployee,
        Section::FlightDestinations,
        Section::TransportModeDist,
        Section::TransportTrendByMonth,
        Section::TotalHours,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::HoursByProject => "hoursByProject",
            Section::UtilizationByEngineer => "utilizationByEngineer",
            Section::ProjectStatusDist => "projectStatusDist",
            Section::HoursByStage => "hoursByStage",
            Section::HoursByProjectType => "hoursByProjectType",
            Section::EmployeeProjectProgress => "employeeProjectProgress",
            Section::TransportByProject => "transportByProject",
            Section::MileageByEmployee => "mileageByEmployee",
            Section::FlightDestinations => "flightDestinations",
            Section::TransportModeDist => "transportModeDist",
            Section::TransportTrendByMonth => "transportTrendByMonth",
            Section::TotalHours => "totalHours",
        }
    }
}

/// The analytics response. `None` sections are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_by_project: Option<Vec<ProjectHours>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_by_engineer: Option<Vec<EngineerUtilization>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_status_dist: Option<Distribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_by_stage: Option<Vec<StageHours>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_by_project_type: Option<Vec<ProjectTypeHours>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_project_progress: Option<Vec<EmployeeProjectProgress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_by_project: Option<Vec<TransportByProject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_by_employee: Option<Vec<EmployeeMileage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_destinations: Option<Vec<FlightDestination>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_mode_dist: Option<Vec<TransportModeShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_trend_by_month: Option<Vec<MonthlyTransport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<HoursTotals>,
    pub omitted_sections: Vec<Section>,
}

/// Inputs to [`analytics_report`]. `None` means the input failed to load.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsInputs<'a> {
    pub filter: &'a ReportFilter,
    pub logs: Option<&'a [TaskLogView]>,
    pub projects: Option<&'a [ProjectRecord]>,
    pub trend_year: i32,
    pub today: NaiveDate,
}

/// Compute every section whose inputs are available.
pub fn analytics_report(inputs: AnalyticsInputs<'_>) -> AnalyticsReport {
    let mut report = AnalyticsReport::default();

    if let Some(logs) = inputs.logs {
        report.hours_by_project = Some(hours_by_project(logs));
        report.utilization_by_engineer = Some(utilization_by_engineer(logs, inputs.today));
        report.hours_by_stage = Some(hours_by_stage(logs));
        report.hours_by_project_type = Some(hours_by_project_type(logs));
        report.transport_by_project = Some(transport_by_project(logs));
        report.mileage_by_employee = Some(mileage_by_employee(logs));
        report.flight_destinations = Some(flight_destinations(logs));
        report.transport_mode_dist = Some(transport_mode_dist(logs));
        report.transport_trend_by_month = Some(transport_trend_by_month(logs, inputs.trend_year));
        report.total_hours = Some(total_hours(logs));
    }

    if let Some(projects) = inputs.projects {
        // An activity-scoped distribution needs the logs to know which
        // projects were touched.
        let scope = match inputs.logs {
            Some(logs) => Some(ProjectScope::resolve(inputs.filter, projects, logs)),
            None if !inputs.filter.is_activity_scoped() => Some(ProjectScope::all(projects)),
            None => None,
        };
        report.project_status_dist = scope.map(|s| project_distribution(&s, Dimension::Status));

        if let Some(logs) = inputs.logs {
            report.employee_project_progress = Some(employee_project_progress(logs, projects));
        }
    }

    let omitted: Vec<Section> = Section::ALL
        .into_iter()
        .filter(|section| !report.has(*section))
        .collect();
    report.omitted_sections = omitted;
    report
}

impl AnalyticsReport {
    /// Whether `section` was computed.
    pub fn has(&self, section: Section) -> bool {
        match section {
            Section::HoursByProject => self.hours_by_project.is_some(),
            Section::UtilizationByEngineer => self.utilization_by_engineer.is_some(),
            Section::ProjectStatusDist => self.project_status_dist.is_some(),
            Section::HoursByStage => self.hours_by_stage.is_some(),
            Section::HoursByProjectType => self.hours_by_project_type.is_some(),
            Section::EmployeeProjectProgress => self.employee_project_progress.is_some(),
            Section::TransportByProject => self.transport_by_project.is_some(),
            Section::MileageByEmployee => self.mileage_by_employee.is_some(),
            Section::FlightDestinations => self.flight_destinations.is_some(),
            Section::TransportModeDist => self.transport_mode_dist.is_some(),
            Section::TransportTrendByMonth => self.transport_trend_by_month.is_some(),
            Section::TotalHours => self.total_hours.is_some(),
        }
    }
}
