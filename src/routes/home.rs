use askama::Template;
use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::db::posts;
use crate::error::AppResult;
use crate::mail::ContactMessage;
use crate::routes::blog::{post_view, PostView};
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Deserialize, Default, Clone)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub latest: Vec<PostView>,
    pub error: Option<String>,
    pub form: ContactForm,
}

/// GET / — landing page with the latest posts and the contact form.
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let latest = posts::get_latest(&state.db, 2)?
        .into_iter()
        .map(post_view)
        .collect();

    Ok(Html(HomeTemplate {
        latest,
        error: None,
        form: ContactForm::default(),
    })
    .into_response())
}

/// POST / — relay a contact-form submission to the site owner.
pub async fn contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> AppResult<Response> {
    let name = form.name.trim();
    let email = form.email.trim();
    let subject = form.subject.trim();
    let message = form.message.trim();

    let error = if name.is_empty() || subject.is_empty() || message.is_empty() {
        Some("All fields are required".to_string())
    } else if !EmailAddress::is_valid(email) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    };

    if let Some(error) = error {
        let latest = posts::get_latest(&state.db, 2)?
            .into_iter()
            .map(post_view)
            .collect();
        let template = HomeTemplate {
            latest,
            error: Some(error),
            form: form.clone(),
        };
        return Ok((StatusCode::BAD_REQUEST, Html(template)).into_response());
    }

    let outgoing = ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
    };

    // Relay failures are logged and swallowed; the redirect happens
    // either way.
    match state.mailer.send(&outgoing).await {
        Ok(()) => tracing::info!(
            "Email sent from {} with subject '{}'",
            outgoing.email,
            outgoing.subject
        ),
        Err(e) => tracing::error!("Failed to relay contact message: {}", e),
    }

    Ok(Redirect::to("/").into_response())
}
