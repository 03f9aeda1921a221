mod auth;
mod redirect;
mod urls;

pub(crate) use auth::{login, logout, me, register};
pub(crate) use redirect::redirect;
pub(crate) use urls::{create_url, delete_url, list_urls, show_url, update_url};

pub use auth::{AuthRequest, AuthResponse};
pub use urls::{UrlRequest, UrlResponse};
