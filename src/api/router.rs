use axum::{
    Router,
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    api::{
        auth::{clear_session_cookie, parse_session_id},
        handlers,
    },
    app::AppState,
};

/// Expire the client's `sid` cookie when it no longer names a live session,
/// unless the handler already set a cookie of its own.
pub async fn clear_stale_sid(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let stale = parse_session_id(req.headers())
        .is_some_and(|sid| app.sessions.get_user_id(&sid).is_err());

    let mut res = next.run(req).await;

    if stale && !res.headers().contains_key(header::SET_COOKIE) {
        res.headers_mut()
            .append(header::SET_COOKIE, clear_session_cookie());
    }

    res
}

pub fn build_router(state: AppState) -> Router {
    let auth_api = Router::new()
        .route("/me", get(handlers::me))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/register", post(handlers::register));

    let api = Router::new()
        .nest("/auth", auth_api)
        .route("/urls", get(handlers::list_urls).post(handlers::create_url))
        .route(
            "/urls/{code}",
            get(handlers::show_url)
                .put(handlers::update_url)
                .delete(handlers::delete_url),
        );

    Router::new()
        .nest("/api", api)
        .route("/u/{code}", get(handlers::redirect))
        .fallback_service(ServeDir::new(&state.public_dir))
        .layer(middleware::from_fn_with_state(state.clone(), clear_stale_sid))
        .with_state(state)
}
