//! HS256 bearer tokens via `jsonwebtoken`.
//!
//! Claims: `sub` (user id), `adm` (admin flag at issue time), `iat` and `exp`
//! as Unix seconds. Expiry is checked against the caller's clock rather than
//! the system clock so tests can move time.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, TokenClaims, User, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    adm: bool,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl JwtTokenService {
    pub fn new(secret: &Zeroizing<Vec<u8>>, ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::invalid(format!("timestamp out of range: {seconds}")))
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AccessToken, TokenError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user.user_id.to_string(),
            adm: user.is_admin,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|error| TokenError::signing(error.to_string()))?;
        Ok(AccessToken {
            token,
            // Sub-second precision is dropped in the token; keep the response
            // consistent with it.
            expires_at: timestamp(claims.exp)?,
        })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::invalid(error.to_string()),
            })?;
        let claims = data.claims;
        let expires_at = timestamp(claims.exp)?;
        if expires_at <= now {
            return Err(TokenError::Expired);
        }
        let user_id = UserId::new(claims.sub)
            .map_err(|error| TokenError::invalid(format!("subject: {error}")))?;
        Ok(TokenClaims {
            user_id,
            is_admin: claims.adm,
            issued_at: timestamp(claims.iat)?,
            expires_at,
        })
    }
}
