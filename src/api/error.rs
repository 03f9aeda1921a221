use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{EmailParseError, PasswordParseError, TargetUrlParseError},
    services::ServiceError,
};

#[derive(Debug)]
pub struct ApiError {
    status_code: StatusCode,
    reason: &'static str,
}

#[derive(Deserialize, Serialize)]
struct ApiErrorBody(&'static str);

impl ApiError {
    pub fn public(status_code: StatusCode, reason: &'static str) -> Self {
        Self {
            status_code,
            reason,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status_code: StatusCode::NOT_FOUND,
            reason: "Not found",
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status_code: StatusCode::UNAUTHORIZED,
            reason: "Not logged in",
        }
    }

    pub fn internal() -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            reason: "Internal server error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::DuplicateEmail => {
                Self::public(StatusCode::CONFLICT, "Email already registered")
            }
            ServiceError::AuthFailure => {
                Self::public(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            ServiceError::NotFound => Self::public(StatusCode::NOT_FOUND, "URL not found"),
            ServiceError::Forbidden => Self::public(
                StatusCode::FORBIDDEN,
                "You do not have permission to access this URL",
            ),
            ServiceError::GenerationExhausted => {
                tracing::error!("short code generation exhausted");
                Self::internal()
            }
            ServiceError::Other(e) => {
                tracing::error!(error = %e, "service error");
                Self::internal()
            }
        }
    }
}

impl From<TargetUrlParseError> for ApiError {
    fn from(error: TargetUrlParseError) -> Self {
        match error {
            TargetUrlParseError::ContainsUserinfo => {
                Self::public(StatusCode::BAD_REQUEST, "URL contains credentials")
            }
            TargetUrlParseError::WrongScheme(_) => {
                Self::public(StatusCode::BAD_REQUEST, "This URL scheme is not supported")
            }
            TargetUrlParseError::BlockedHost(_) => {
                Self::public(StatusCode::BAD_REQUEST, "This host is not allowed")
            }
            TargetUrlParseError::EmptyHost => {
                Self::public(StatusCode::BAD_REQUEST, "This URL is incomplete")
            }
            TargetUrlParseError::Invalid(_) => {
                Self::public(StatusCode::BAD_REQUEST, "This URL is invalid")
            }
        }
    }
}

impl From<EmailParseError> for ApiError {
    fn from(error: EmailParseError) -> Self {
        match error {
            EmailParseError::Empty => Self::public(StatusCode::BAD_REQUEST, "Email is required"),
            EmailParseError::TooLong => Self::public(StatusCode::BAD_REQUEST, "Email is too long"),
            EmailParseError::Malformed => {
                Self::public(StatusCode::BAD_REQUEST, "Email is not valid")
            }
        }
    }
}

impl From<PasswordParseError> for ApiError {
    fn from(error: PasswordParseError) -> Self {
        match error {
            PasswordParseError::Empty => {
                Self::public(StatusCode::BAD_REQUEST, "Password is required")
            }
            PasswordParseError::TooLong => {
                Self::public(StatusCode::BAD_REQUEST, "Password is too long")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(ApiErrorBody(self.reason))).into_response()
    }
}
