use std::time::Duration;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
};
use cookie::{Cookie, SameSite};

use crate::{api::error::ApiError, app::AppState, domain::User};

pub const SESSION_COOKIE: &str = "sid";

/// Handler argument for routes that need a logged-in user; rejects with 401 otherwise
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(&parts.headers, state)
            .map(RequireUser)
            .ok_or_else(ApiError::unauthorized)
    }
}

pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user(&parts.headers, state)))
    }
}

fn current_user(headers: &HeaderMap, state: &AppState) -> Option<User> {
    let sid = parse_session_id(headers)?;
    let user_id = state.sessions.get_user_id(&sid).ok()?;

    state.credentials.find_by_id(&user_id)
}

pub(crate) fn parse_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

pub(crate) fn session_cookie(session_id: &str, ttl: Duration) -> Result<HeaderValue, ApiError> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .secure(false) // no https for now
        .build();

    HeaderValue::from_str(&cookie.to_string()).map_err(|e| {
        tracing::error!(error = %e, "session cookie is not a valid header value");
        ApiError::internal()
    })
}

pub(crate) fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("sid=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax")
}
