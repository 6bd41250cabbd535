//! Port for issuing and verifying bearer tokens.

use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, Error, TokenClaims, User};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// Signature, structure or claims were rejected.
        Invalid { message: String } => "invalid token: {message}",
        /// The token is past its expiry.
        Expired => "token has expired",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

impl From<TokenError> for Error {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid { .. } => Error::unauthorized("invalid token"),
            TokenError::Expired => Error::unauthorized("token has expired"),
            TokenError::Signing { message } => {
                Error::internal(format!("token signing failed: {message}"))
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `user`, valid from `now`.
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AccessToken, TokenError>;

    /// Verify signature and expiry against `now`.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError>;
}
