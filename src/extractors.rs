use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::auth::session::{self, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated administrator.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub user_id: i64,
}

/// Extractor that requires an admin session. Requests without a valid
/// session are redirected to the login page.
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(parts).ok_or(AppError::Unauthorized)?;

        match session::admin_for_token(&state.db, token)? {
            Some(user_id) => Ok(CurrentAdmin { user_id }),
            None => Err(AppError::Unauthorized),
        }
    }
}

/// Optional admin extractor for pages that render differently when the
/// admin is signed in.
pub struct MaybeAdmin(pub Option<CurrentAdmin>);

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentAdmin::from_request_parts(parts, state).await {
            Ok(admin) => Ok(MaybeAdmin(Some(admin))),
            Err(_) => Ok(MaybeAdmin(None)),
        }
    }
}

pub fn extract_session_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == SESSION_COOKIE {
                Some(val)
            } else {
                None
            }
        })
}
