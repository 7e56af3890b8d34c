//! Task-log submission validation.
//!
//! [`TaskLogSubmission`] is the request body of `POST /tasks`. Field-level
//! limits are declared with `validator`; [`TaskLogSubmission::into_new_task_log`]
//! adds the cross-field transport rules and the man-hour invariant and produces
//! a normalized [`NewTaskLog`] for the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::filter::parse_date;
use crate::taxonomy::{Stage, TaskType, TransportMode, WorkStatus};
use crate::types::{DbId, Hours};

/// Most hours a single log may carry in either component.
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// Allowed gap between a client-sent total and the recomputed one.
pub const TOTAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskLogSubmission {
    #[validate(range(min = 1))]
    pub project_id: DbId,
    pub work_date: String,
    pub stage: String,
    pub task_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub project_hours: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0))]
    pub travel_hours: f64,
    /// Client-computed total. Checked, never stored.
    pub total_man_hours: Option<f64>,
    #[serde(default)]
    pub leaves_office: bool,
    pub transport_mode: Option<String>,
    #[validate(range(min = 0.0))]
    pub mileage: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    pub destination: Option<String>,
}

/// A validated log ready to be upserted for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskLog {
    pub employee_id: DbId,
    pub project_id: DbId,
    pub work_date: NaiveDate,
    pub stage: Stage,
    pub task_type: TaskType,
    pub status: WorkStatus,
    pub description: Option<String>,
    pub project_hours: Hours,
    pub travel_hours: Hours,
    pub leaves_office: bool,
    pub transport_mode: Option<TransportMode>,
    pub mileage: Option<f64>,
    pub destination: Option<String>,
}

impl NewTaskLog {
    /// The value persisted as `total_man_hours`.
    pub fn total_man_hours(&self) -> Hours {
        self.project_hours + self.travel_hours
    }
}

impl TaskLogSubmission {
    /// Validate the submission and attribute it to `employee_id`.
    pub fn into_new_task_log(self, employee_id: DbId) -> Result<NewTaskLog, CoreError> {
        self.validate().map_err(first_field_error)?;

        let work_date = parse_date("workDate", &self.work_date)?;
        let stage = Stage::parse_field("stage", &self.stage)?;
        let task_type = TaskType::parse_field("taskType", &self.task_type)?;
        let status = match self.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => WorkStatus::parse_field("status", raw)?,
            _ => WorkStatus::Active,
        };

        for (field, value) in [
            ("projectHours", self.project_hours),
            ("travelHours", self.travel_hours),
        ] {
            if !value.is_finite() {
                return Err(CoreError::invalid_field(field, "must be a finite number"));
            }
        }

        let total = self.project_hours + self.travel_hours;
        if let Some(claimed) = self.total_man_hours {
            if (claimed - total).abs() > TOTAL_TOLERANCE {
                return Err(CoreError::invalid_field(
                    "totalManHours",
                    format!("{claimed} does not equal projectHours + travelHours ({total})"),
                ));
            }
        }
        if total > MAX_HOURS_PER_DAY {
            return Err(CoreError::invalid_field(
                "travelHours",
                format!("project and travel hours together exceed {MAX_HOURS_PER_DAY}"),
            ));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let mut log = NewTaskLog {
            employee_id,
            project_id: self.project_id,
            work_date,
            stage,
            task_type,
            status,
            description,
            project_hours: self.project_hours,
            travel_hours: self.travel_hours,
            leaves_office: self.leaves_office,
            transport_mode: None,
            mileage: None,
            destination: None,
        };

        if !self.leaves_office {
            if self.travel_hours > 0.0 {
                return Err(CoreError::invalid_field(
                    "travelHours",
                    "must be 0 when the task does not leave the office",
                ));
            }
            return Ok(log);
        }

        let mode = match self.transport_mode.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => TransportMode::parse_field("transportMode", raw)?,
            _ => {
                return Err(CoreError::invalid_field(
                    "transportMode",
                    "is required when the task leaves the office",
                ))
            }
        };
        let destination = self
            .destination
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        match mode {
            TransportMode::Road => {
                if destination.is_some() {
                    return Err(CoreError::invalid_field(
                        "destination",
                        "is only recorded for flights",
                    ));
                }
                log.mileage = self.mileage;
            }
            TransportMode::Flight => {
                if self.mileage.is_some() {
                    return Err(CoreError::invalid_field(
                        "mileage",
                        "is only recorded for road travel",
                    ));
                }
                if destination.is_none() {
                    return Err(CoreError::invalid_field(
                        "destination",
                        "is required for flights",
                    ));
                }
                log.destination = destination;
            }
            TransportMode::Other => {
                if self.mileage.is_some() {
                    return Err(CoreError::invalid_field(
                        "mileage",
                        "is only recorded for road travel",
                    ));
                }
                if destination.is_some() {
                    return Err(CoreError::invalid_field(
                        "destination",
                        "is only recorded for flights",
                    ));
                }
            }
        }
        log.transport_mode = Some(mode);
        Ok(log)
    }
}

/// Collapse `validator` output into the first failing field, by wire name.
fn first_field_error(errors: ValidationErrors) -> CoreError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.into_iter().next() {
        Some((field, errs)) => {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| match errs.first() {
                    Some(e) => format!("failed '{}' check", e.code),
                    None => "is invalid".to_string(),
                });
            CoreError::invalid_field(camel_case(&field), reason)
        }
        None => CoreError::Validation(errors.to_string()),
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
