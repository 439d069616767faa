pub mod polls;

use crate::error::AppError;

/// Anything outside the poll pages.
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route");
    AppError::not_found("page not found")
}
