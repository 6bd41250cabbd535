//! Supporter accounts.
//!
//! [`User`] is the stored record including the password hash. Handlers only
//! ever return [`UserProfile`], which omits credentials.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::validation::{FieldErrorCode, bounded_text, field_error, optional_text};
use super::Error;

/// Minimum allowed length for a user id.
pub const USER_ID_MIN: usize = 3;
/// Maximum allowed length for a user id.
pub const USER_ID_MAX: usize = 20;
/// Minimum password length.
pub const PASSWORD_MIN: usize = 8;
/// bcrypt ignores input beyond 72 bytes, so longer passwords are refused.
pub const PASSWORD_MAX_BYTES: usize = 72;
const NAME_MAX: usize = 30;
const FAVORITE_PLAYER_MAX: usize = 50;
const BIO_MAX: usize = 200;

static USER_ID_RE: OnceLock<Regex> = OnceLock::new();

fn user_id_regex() -> &'static Regex {
    USER_ID_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[A-Za-z0-9_-]+$")
            .unwrap_or_else(|error| panic!("user id regex failed to compile: {error}"))
    })
}

/// Login identifier chosen by the supporter at registration.
///
/// ## Invariants
/// - 3 to 20 characters drawn from `A-Z`, `a-z`, `0-9`, `_` and `-`.
/// - Only [`UserId::new`] checks this. Deserialisation accepts stored ids
///   as they are, so rows written under older rules still load.
///
/// # Examples
/// ```
/// use giravent::domain::UserId;
///
/// assert!(UserId::new("giran_fan").is_ok());
/// assert!(UserId::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        let length = id.chars().count();
        if length == 0 {
            return Err(field_error(
                "userId",
                FieldErrorCode::Missing,
                "userId must not be empty",
            ));
        }
        if !(USER_ID_MIN..=USER_ID_MAX).contains(&length) {
            return Err(field_error(
                "userId",
                FieldErrorCode::OutOfRange,
                format!("userId must be {USER_ID_MIN} to {USER_ID_MAX} characters"),
            ));
        }
        if !user_id_regex().is_match(&id) {
            return Err(field_error(
                "userId",
                FieldErrorCode::InvalidCharacters,
                "userId may only contain letters, numbers, underscores, or hyphens",
            ));
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Plain-text password held only long enough to hash or verify it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password against the length policy.
    pub fn new(field: &str, raw: &str) -> Result<Self, Error> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(field_error(
                field,
                FieldErrorCode::TooShort,
                format!("{field} must be at least {PASSWORD_MIN} characters"),
            ));
        }
        if raw.len() > PASSWORD_MAX_BYTES {
            return Err(field_error(
                field,
                FieldErrorCode::TooLong,
                format!("{field} must be at most {PASSWORD_MAX_BYTES} bytes"),
            ));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Wrap a password supplied for verification without applying the policy.
    #[must_use]
    pub fn unchecked(raw: &str) -> Self {
        Self(Zeroizing::new(raw.to_owned()))
    }

    /// Expose the secret to a hasher.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored supporter account.
///
/// Serialised with camelCase keys; this is also the DynamoDB item layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True when the account may sign in and call authenticated endpoints.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.deleted && !self.suspended
    }

    /// Public view of the account.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            is_admin: self.is_admin,
            suspended: self.suspended,
            deleted: self.deleted,
            favorite_player: self.favorite_player.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Account data returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String, example = "giran_fan")]
    pub user_id: UserId,
    #[schema(example = "Kita Taro")]
    pub name: String,
    pub is_admin: bool,
    pub suspended: bool,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: UserId,
    pub name: String,
    pub password: Password,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_from_parts(user_id: &str, name: &str, password: &str) -> Result<Self, Error> {
        Ok(Self {
            user_id: UserId::new(user_id.trim())?,
            name: bounded_text("name", name, 1, NAME_MAX)?,
            password: Password::new("password", password)?,
        })
    }
}

/// Partial profile update. `None` leaves a field unchanged; an empty string
/// clears the optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub favorite_player: Option<Option<String>>,
    pub bio: Option<Option<String>>,
}

impl ProfileUpdate {
    /// Validate raw profile fields.
    pub fn try_from_parts(
        name: Option<&str>,
        favorite_player: Option<&str>,
        bio: Option<&str>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: name
                .map(|value| bounded_text("name", value, 1, NAME_MAX))
                .transpose()?,
            favorite_player: favorite_player
                .map(|value| optional_text("favoritePlayer", Some(value), FAVORITE_PLAYER_MAX))
                .transpose()?,
            bio: bio
                .map(|value| optional_text("bio", Some(value), BIO_MAX))
                .transpose()?,
        })
    }

    /// Apply the update to `user`, stamping `now` as the modification time.
    pub fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(favorite_player) = self.favorite_player {
            user.favorite_player = favorite_player;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        user.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        User {
            user_id: UserId::new("giran_fan").expect("valid id"),
            name: "Kita Taro".to_owned(),
            password_hash: "$2b$04$hash".to_owned(),
            is_admin: false,
            suspended: false,
            deleted: false,
            favorite_player: None,
            bio: Some("Mikuni World Stadium regular".to_owned()),
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    #[case("ab")]
    #[case("abcdefghijklmnopqrstu")]
    #[case("has space")]
    #[case("dot.ted")]
    #[case("")]
    fn user_id_rejects_invalid_values(#[case] raw: &str) {
        assert!(UserId::new(raw).is_err());
    }

    #[rstest]
    #[case("abc")]
    #[case("giran-fan_2026")]
    #[case("ABCDEFGHIJ0123456789")]
    fn user_id_accepts_valid_values(#[case] raw: &str) {
        assert_eq!(UserId::new(raw).expect("valid").as_ref(), raw);
    }

    #[rstest]
    fn password_policy_enforces_length() {
        assert!(Password::new("password", "short").is_err());
        assert!(Password::new("password", &"x".repeat(73)).is_err());
        assert!(Password::new("password", "longenough").is_ok());
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = Password::unchecked("hunter22");
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[rstest]
    fn profile_omits_password_hash(user: User) {
        let value = serde_json::to_value(user.profile()).expect("serialise profile");
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["userId"], "giran_fan");
        assert_eq!(value["bio"], "Mikuni World Stadium regular");
    }

    #[rstest]
    fn stored_user_round_trips_camel_case(user: User) {
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(value["passwordHash"], "$2b$04$hash");
        let decoded: User = serde_json::from_value(value).expect("decode user");
        assert_eq!(decoded, user);
    }

    #[rstest]
    fn stored_ids_skip_registration_rules() {
        let id: UserId = serde_json::from_value(serde_json::json!("kita.taro@example"))
            .expect("stored id");
        assert_eq!(id.as_ref(), "kita.taro@example");
        assert!(UserId::new("kita.taro@example").is_err());
    }

    #[rstest]
    fn profile_update_clears_blank_optional_fields(mut user: User) {
        let update = ProfileUpdate::try_from_parts(Some(" New Name "), Some("Nagai"), Some(" "))
            .expect("valid update");
        let now = user.created_at + chrono::Duration::hours(1);
        update.apply(&mut user, now);
        assert_eq!(user.name, "New Name");
        assert_eq!(user.favorite_player.as_deref(), Some("Nagai"));
        assert!(user.bio.is_none());
        assert_eq!(user.updated_at, now);
    }

    #[rstest]
    fn registration_validates_every_field() {
        let error = Registration::try_from_parts("giran_fan", "   ", "password1")
            .expect_err("blank name");
        assert_eq!(
            error.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
            Some("name")
        );
    }
}
