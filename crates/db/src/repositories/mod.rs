//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod project_repo;
pub mod staff_repo;
pub mod task_log_repo;

pub use project_repo::ProjectRepo;
pub use staff_repo::StaffRepo;
pub use task_log_repo::TaskLogRepo;
