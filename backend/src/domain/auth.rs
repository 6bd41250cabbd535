//! Authentication primitives: login credentials and bearer token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{Password, UserId};
use super::validation::{FieldErrorCode, field_error};
use super::Error;

/// Credentials submitted to `POST /auth/login`.
///
/// ## Invariants
/// - `user_id` is trimmed and syntactically valid.
/// - `password` is non-empty; the length policy only applies when setting a
///   password, so older accounts can still sign in.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    user_id: UserId,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Examples
    /// ```
    /// use giravent::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts(" giran_fan ", "password1").unwrap();
    /// assert_eq!(creds.user_id().as_ref(), "giran_fan");
    /// ```
    pub fn try_from_parts(user_id: &str, password: &str) -> Result<Self, Error> {
        let user_id = UserId::new(user_id.trim())?;
        if password.is_empty() {
            return Err(field_error(
                "password",
                FieldErrorCode::Missing,
                "password must not be empty",
            ));
        }
        Ok(Self {
            user_id,
            password: Password::unchecked(password),
        })
    }

    /// Account identifier to look up.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Password to verify against the stored hash.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Verified contents of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub is_admin: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signed bearer token handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
