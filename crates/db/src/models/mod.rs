//! Row structs for the worklog tables.
//!
//! Each submodule holds the `FromRow` structs read from the database and
//! their conversions into the `worklog_core::records` types the report
//! engine consumes.

pub mod project;
pub mod staff;
pub mod task_log;
