//! Record builders shared by the unit tests.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::assignment::Assignment;
use crate::records::{ProjectRecord, StaffRecord, TaskLogView};
use crate::types::DbId;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A one-hour office log with every join resolved.
pub fn log(employee_id: DbId, project_id: DbId, work_date: NaiveDate) -> TaskLogView {
    TaskLogView {
        id: 0,
        employee_id,
        employee_name: Some(format!("Engineer {employee_id}")),
        employee_email: Some(format!("engineer{employee_id}@example.com")),
        project_id,
        project_number: Some(format!("P-{project_id:03}")),
        project_name: Some(format!("Project {project_id}")),
        project_type: Some("Office Block".into()),
        architect: None,
        work_date,
        stage: "Design".into(),
        task_type: "Design".into(),
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

pub fn project(id: DbId, number: &str, status: &str, assignment: Assignment) -> ProjectRecord {
    ProjectRecord {
        id,
        project_number: number.into(),
        project_name: format!("Project {id}"),
        project_type: None,
        stage: None,
        status: status.into(),
        architect: None,
        assignment,
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
    }
}

pub fn staff(id: DbId, name: &str, role: &str) -> StaffRecord {
    StaffRecord {
        id,
        name: name.into(),
        email: format!("staff{id}@example.com"),
        role: role.into(),
        engineer_type: None,
    }
}
