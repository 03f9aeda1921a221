#![allow(dead_code)]

use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use tinyapp::{
    api,
    app::{self, AppState},
    config::Settings,
};

/// Cheapest argon2id parameters; production cost makes the suite crawl
pub fn fast_hasher() -> Argon2<'static> {
    let params = Params::new(8, 1, 1, None).unwrap();
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

pub fn test_settings() -> Settings {
    Settings {
        hash_memory_kib: 8,
        hash_iterations: 1,
        hash_parallelism: 1,
        ..Settings::default()
    }
}

pub fn router_with(settings: &Settings) -> (Router, AppState) {
    let state = app::build_app_state(settings).expect("Failed to build app state");
    (api::build_router(state.clone()), state)
}

pub fn router() -> (Router, AppState) {
    router_with(&test_settings())
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

// Deserialize a Response into T
pub async fn json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `sid=...` pair from a response's Set-Cookie, ready to send back as a Cookie header
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("sid=") && *pair != "sid=")
        .map(str::to_string)
}

pub fn clears_session(response: &Response) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with("sid=;") && value.contains("Max-Age=0"))
}
