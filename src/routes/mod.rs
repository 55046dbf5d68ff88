pub mod admin;
pub mod assets;
pub mod auth;
pub mod blog;
pub mod home;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Fallback for unmatched paths.
pub async fn not_found() -> Response {
    AppError::NotFound.into_response()
}
