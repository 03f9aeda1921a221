mod credentials;
mod short_code;
mod target_url;
mod user;

pub use credentials::{Email, EmailParseError, Password, PasswordParseError};
pub use short_code::{SHORT_CODE_LENGTH, ShortCode, ShortCodeParseError};
pub use target_url::{TargetUrl, TargetUrlParseError};
pub use user::{User, UserId};

use rand::{Rng, distributions::Alphanumeric};

/// Draw `len` characters uniformly from `[A-Za-z0-9]`
pub(crate) fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
