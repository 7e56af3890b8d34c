//! SQL rendering of [`ReportFilter`].
//!
//! The rendered clause encodes the same rules as `ReportFilter::matches`:
//! taxonomy filters match every accepted spelling of the label, and the date
//! window bounds `work_date` inclusively by calendar day.

use chrono::NaiveDate;
use worklog_core::filter::{DateWindow, ReportFilter};

/// Typed bind value for dynamically-built task log queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    TextArray(Vec<String>),
    Date(NaiveDate),
}

/// A rendered `WHERE` clause and its bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    /// Empty when nothing is constrained, otherwise starts with `WHERE `.
    pub where_clause: String,
    pub bind_values: Vec<BindValue>,
    /// Index of the next free `$n` placeholder.
    pub next_bind_idx: u32,
}

/// Render `filter` against task log columns qualified with `alias`.
pub fn render_report_filter(filter: &ReportFilter, alias: &str) -> SqlFilter {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(engineer_id) = filter.engineer_id {
        conditions.push(format!("{alias}.employee_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(engineer_id));
    }

    if let Some(project_id) = filter.project_id {
        conditions.push(format!("{alias}.project_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(project_id));
    }

    let labels = [
        ("stage", filter.stage.map(|s| s.spellings())),
        ("task_type", filter.task_type.map(|t| t.spellings())),
        ("status", filter.status.map(|s| s.spellings())),
    ];
    for (column, spellings) in labels {
        if let Some(spellings) = spellings {
            conditions.push(format!("{alias}.{column} = ANY(${bind_idx})"));
            bind_idx += 1;
            bind_values.push(BindValue::TextArray(
                spellings.iter().map(|s| s.to_string()).collect(),
            ));
        }
    }

    bind_idx = push_window(&filter.window, alias, bind_idx, &mut conditions, &mut bind_values);

    SqlFilter {
        where_clause: where_clause(&conditions),
        bind_values,
        next_bind_idx: bind_idx,
    }
}

/// Render only a date window. Used by the weekly compliance counts.
pub fn render_window(window: &DateWindow, alias: &str) -> SqlFilter {
    let mut conditions = Vec::new();
    let mut bind_values = Vec::new();
    let bind_idx = push_window(window, alias, 1, &mut conditions, &mut bind_values);
    SqlFilter {
        where_clause: where_clause(&conditions),
        bind_values,
        next_bind_idx: bind_idx,
    }
}

fn push_window(
    window: &DateWindow,
    alias: &str,
    mut bind_idx: u32,
    conditions: &mut Vec<String>,
    bind_values: &mut Vec<BindValue>,
) -> u32 {
    if let Some(start) = window.start_date() {
        conditions.push(format!("{alias}.work_date >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(start));
    }
    if let Some(end) = window.end_date() {
        conditions.push(format!("{alias}.work_date <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(end));
    }
    bind_idx
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::TextArray(v) => q = q.bind(v.as_slice()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
