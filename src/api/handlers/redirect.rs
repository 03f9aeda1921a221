use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::{
    api::{error::ApiError, handlers::urls::parse_code},
    app::AppState,
};

pub async fn redirect(
    State(app): State<AppState>,
    Path(code): Path<String>,
) -> Result<Redirect, ApiError> {
    let code = parse_code(&code)?;

    let record = app.registry.get(&code).ok_or_else(|| {
        tracing::debug!("short code not found: {code}");
        ApiError::not_found()
    })?;

    Ok(Redirect::temporary(record.target_url.as_str()))
}
