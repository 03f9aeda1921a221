mod auth;
mod error;
pub mod handlers;
mod router;
mod session;

pub use auth::SESSION_COOKIE;
pub use error::ApiError;
pub use router::build_router;
pub use session::{MAX_SESSION_TTL, SessionError, SessionId, Sessions};
