use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::db::StoreError;

#[derive(Template)]
#[template(path = "pages/404.html")]
struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorTemplate {
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn html_page(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                let body = NotFoundTemplate
                    .render()
                    .unwrap_or_else(|_| "Not found".to_string());
                html_page(StatusCode::NOT_FOUND, body)
            }
            // Session missing or expired; send the visitor to the login page.
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                let body = ErrorTemplate {
                    message: msg.clone(),
                }
                .render()
                .unwrap_or_else(|_| msg);
                html_page(StatusCode::BAD_REQUEST, body)
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                let body = ErrorTemplate {
                    message: "Internal server error".to_string(),
                }
                .render()
                .unwrap_or_else(|_| "Internal server error".to_string());
                html_page(StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body = ErrorTemplate {
                    message: "Internal server error".to_string(),
                }
                .render()
                .unwrap_or_else(|_| "Internal server error".to_string());
                html_page(StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
