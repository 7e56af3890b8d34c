//! Worklog domain core.
//!
//! Pure reporting logic over task logs, projects and staff: the report
//! filter, the aggregation sections, project-level distributions and KPIs,
//! weekly submission compliance and submission validation. No I/O lives
//! here; the `db` crate supplies the records and the `api` crate serves the
//! results.

pub mod analytics;
pub mod assignment;
pub mod compliance;
pub mod error;
pub mod filter;
pub mod projects;
pub mod report;
pub mod records;
pub mod roles;
pub mod schedule;
pub mod task_log;
pub mod taxonomy;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
