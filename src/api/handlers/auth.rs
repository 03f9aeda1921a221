use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        auth::{MaybeUser, RequireUser, clear_session_cookie, parse_session_id, session_cookie},
        error::ApiError,
    },
    app::AppState,
    domain::{Email, Password, User, UserId},
    services::ServiceError,
};

#[derive(Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: String,
    pub email: String,
}

impl From<&User> for AuthResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
        }
    }
}

fn with_session(
    app: &AppState,
    status: StatusCode,
    user_id: UserId,
    body: AuthResponse,
) -> Result<Response, ApiError> {
    let session_id = app.sessions.new_session(user_id);
    let cookie = session_cookie(session_id.as_str(), app.sessions.ttl())?;

    let mut response = (status, Json(body)).into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);

    Ok(response)
}

/// Run a password-hashing call off the async workers
async fn hashing<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}

pub async fn register(
    MaybeUser(user): MaybeUser,
    State(app): State<AppState>,
    Json(AuthRequest { email, password }): Json<AuthRequest>,
) -> Result<Response, ApiError> {
    if user.is_some() {
        return Err(ApiError::public(
            StatusCode::BAD_REQUEST,
            "Already signed in",
        ));
    }

    let email = Email::parse(&email)?;
    let password = Password::parse(&password)?;

    let credentials = app.credentials.clone();
    let body_email = email.to_string();
    let user_id = hashing(move || credentials.register(email, &password))
        .await
        .inspect_err(|e| tracing::debug!(status = %e.status_code(), "registration rejected"))?;

    tracing::info!(user_id = %user_id, "registered new user");

    let body = AuthResponse {
        id: user_id.to_string(),
        email: body_email,
    };
    with_session(&app, StatusCode::CREATED, user_id, body)
}

pub async fn login(
    State(app): State<AppState>,
    Json(AuthRequest { email, password }): Json<AuthRequest>,
) -> Result<Response, ApiError> {
    // oversized input can never match; don't spend a hash on it
    if Password::parse(&password).is_err() {
        return Err(ServiceError::AuthFailure.into());
    }

    let credentials = app.credentials.clone();
    let user = hashing(move || credentials.verify(&email, &password))
        .await
        .inspect_err(|_| tracing::debug!("login rejected"))?;

    let body = AuthResponse::from(&user);
    with_session(&app, StatusCode::OK, user.id().clone(), body)
}

pub async fn logout(State(app): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(sid) = parse_session_id(&headers) {
        app.sessions.end_session(&sid);
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, clear_session_cookie());
    response
}

pub async fn me(RequireUser(user): RequireUser) -> Json<AuthResponse> {
    Json(AuthResponse::from(&user))
}
