use askama::Template;
use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::{self, session};
use crate::error::AppResult;
use crate::extractors::{extract_session_token, MaybeAdmin};
use crate::routes::home::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login — render the login page. An admin who is already signed in
/// goes straight to the dashboard.
async fn login_page(MaybeAdmin(admin): MaybeAdmin) -> Response {
    if admin.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    Html(LoginTemplate { error: None }).into_response()
}

/// POST /login — verify credentials and start a session.
async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match auth::matching_user(&state.db, &form.username, &form.password)? {
        Some(user_id) => {
            let token = session::create_session(&state.db, user_id, state.config.auth.session_hours)?;

            Ok((
                StatusCode::SEE_OTHER,
                [
                    (header::LOCATION, "/dashboard".to_string()),
                    (
                        header::SET_COOKIE,
                        session::session_cookie(&token, state.config.auth.session_hours),
                    ),
                ],
                "",
            )
                .into_response())
        }
        None => {
            // The submitted username doubles as a credential, so it stays
            // out of the log line.
            tracing::warn!("Invalid login attempt");

            let template = LoginTemplate {
                error: Some("Invalid username or password".to_string()),
            };
            Ok((StatusCode::UNAUTHORIZED, Html(template)).into_response())
        }
    }
}

/// POST /logout — delete the session and clear the cookie.
async fn logout(
    State(state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
) -> AppResult<Response> {
    let (parts, _body) = request.into_parts();

    if let Some(token) = extract_session_token(&parts) {
        session::delete_session(&state.db, token)?;
    }

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, session::clear_session_cookie()),
        ],
        "",
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
}
