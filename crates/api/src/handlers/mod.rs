pub mod meta;
pub mod reports;
pub mod task_logs;
pub mod weekly;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;

use crate::error::{AppError, AppResult};

/// Unwrap a query extractor, turning axum's plain-text rejection into the
/// JSON error body.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}
