mod admin_auth;
mod request_log;

pub use admin_auth::*;
pub use request_log::*;

use std::fmt;

/// Outcome of checking the admin token on a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVerdict {
    Accepted,
    MissingToken,
    /// Carries the token that was presented.
    InvalidToken(String),
}

/// Log form. A presented wrong token is cut to its first four characters.
impl fmt::Display for AuthVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthVerdict::Accepted => f.write_str("accept"),
            AuthVerdict::MissingToken => f.write_str("reject (missing token)"),
            AuthVerdict::InvalidToken(token) => {
                let shown: String = token.chars().take(4).collect();
                write!(f, "reject (invalid token: {}***)", shown)
            }
        }
    }
}
