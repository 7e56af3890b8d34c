//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `staff.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
