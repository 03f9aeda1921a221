use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{auth::RequireUser, error::ApiError},
    app::AppState,
    domain::{ShortCode, TargetUrl},
    services::{ServiceError, UrlRecord},
};

#[derive(Serialize, Deserialize)]
pub struct UrlRequest {
    pub target_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub short_code: String,
    pub target_url: String,
}

/// A code that doesn't parse can't exist, so treat it as unknown
pub(crate) fn parse_code(code: &str) -> Result<ShortCode, ApiError> {
    ShortCode::parse(code).map_err(|e| {
        tracing::debug!(error = %e, "malformed short code");
        ApiError::not_found()
    })
}

pub async fn list_urls(
    RequireUser(user): RequireUser,
    State(app): State<AppState>,
) -> Json<BTreeMap<ShortCode, UrlRecord>> {
    Json(app.registry.list_by_owner(user.id()))
}

pub async fn create_url(
    RequireUser(user): RequireUser,
    State(app): State<AppState>,
    Json(UrlRequest { target_url }): Json<UrlRequest>,
) -> Result<Response, ApiError> {
    let target_url = TargetUrl::parse(&target_url).map_err(|e| {
        tracing::debug!(error = %e, "url parse error");
        ApiError::from(e)
    })?;

    let body_url = target_url.to_string();
    let code = app.registry.create(user.id(), target_url)?;

    tracing::info!(short_code = %code, owner_id = %user.id(), "created short url");

    let body = UrlResponse {
        short_code: code.to_string(),
        target_url: body_url,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub async fn show_url(
    RequireUser(user): RequireUser,
    State(app): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UrlResponse>, ApiError> {
    let code = parse_code(&code)?;
    let record = app.registry.get(&code).ok_or(ServiceError::NotFound)?;

    if record.owner_id != *user.id() {
        return Err(ServiceError::Forbidden.into());
    }

    Ok(Json(UrlResponse {
        short_code: code.to_string(),
        target_url: record.target_url.into_string(),
    }))
}

pub async fn update_url(
    RequireUser(user): RequireUser,
    State(app): State<AppState>,
    Path(code): Path<String>,
    Json(UrlRequest { target_url }): Json<UrlRequest>,
) -> Result<StatusCode, ApiError> {
    let code = parse_code(&code)?;

    // unknown and foreign codes take precedence over a bad body
    let record = app.registry.get(&code).ok_or(ServiceError::NotFound)?;
    if record.owner_id != *user.id() {
        return Err(ServiceError::Forbidden.into());
    }
    let target_url = TargetUrl::parse(&target_url)?;

    app.registry
        .update(&code, user.id(), target_url)
        .inspect_err(|e| tracing::debug!(error = %e, short_code = %code, "update rejected"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_url(
    RequireUser(user): RequireUser,
    State(app): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    let code = parse_code(&code)?;

    app.registry
        .delete(&code, user.id())
        .inspect_err(|e| tracing::debug!(error = %e, short_code = %code, "delete rejected"))?;

    tracing::info!(short_code = %code, "deleted short url");

    Ok(StatusCode::NO_CONTENT)
}
