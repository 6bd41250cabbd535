//! Tests for the account service.

use std::sync::{Arc, Mutex};

use chrono::TimeDelta;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockPasswordHasher, MockTokenService, MockUserRepository, PasswordHashError, TokenError,
};
use crate::domain::TokenClaims;
use crate::test_support::{MutableClock, fixture_admin, fixture_timestamp, fixture_user};

struct Harness {
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
}

impl Harness {
    fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            hasher: MockPasswordHasher::new(),
            tokens: MockTokenService::new(),
        }
    }

    fn with_user(mut self, user: User) -> Self {
        self.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        self
    }

    fn hasher_accepts(mut self, accepted: &'static str) -> Self {
        self.hasher
            .expect_verify()
            .returning(move |password, _| Ok(password.expose() == accepted));
        self
    }

    fn build(self) -> AccountService {
        AccountService::new(
            Arc::new(self.users),
            Arc::new(self.hasher),
            Arc::new(self.tokens),
            Arc::new(MutableClock::new(fixture_timestamp())),
        )
    }
}

fn id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

#[tokio::test]
async fn register_hashes_password_and_creates_account() {
    let mut harness = Harness::new();
    harness
        .hasher
        .expect_hash()
        .times(1)
        .returning(|password| Ok(format!("hashed:{}", password.expose())));
    let stored = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&stored);
    harness.users.expect_create().times(1).returning(move |user| {
        *sink.lock().expect("lock") = Some(user.clone());
        Ok(())
    });

    let registration =
        Registration::try_from_parts("giran_fan", "Kita Taro", "password1").expect("valid");
    let profile = harness.build().register(registration).await.expect("registered");

    assert_eq!(profile.user_id.as_ref(), "giran_fan");
    assert!(!profile.is_admin);
    let user = stored.lock().expect("lock").clone().expect("user stored");
    assert_eq!(user.password_hash, "hashed:password1");
}

#[tokio::test]
async fn register_reports_taken_ids_as_conflict() {
    let mut harness = Harness::new();
    harness.hasher.expect_hash().returning(|_| Ok("hash".to_owned()));
    harness
        .users
        .expect_create()
        .returning(|user| Err(RepositoryError::already_exists(user.user_id.to_string())));

    let registration =
        Registration::try_from_parts("giran_fan", "Kita Taro", "password1").expect("valid");
    let error = harness.build().register(registration).await.expect_err("taken");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::wrong_password(fixture_user("giran_fan"), "nope", ErrorCode::Unauthorized)]
#[case::deleted(
    User { deleted: true, ..fixture_user("giran_fan") },
    "secret",
    ErrorCode::Unauthorized
)]
#[case::suspended(
    User { suspended: true, ..fixture_user("giran_fan") },
    "secret",
    ErrorCode::Forbidden
)]
#[tokio::test]
async fn login_rejections(#[case] user: User, #[case] password: &str, #[case] code: ErrorCode) {
    let service = Harness::new().with_user(user).hasher_accepts("secret").build();
    let credentials = LoginCredentials::try_from_parts("giran_fan", password).expect("shape");
    let error = service.login(&credentials).await.expect_err("rejected");
    assert_eq!(error.code(), code);
}

#[tokio::test]
async fn login_rejects_unknown_users_as_invalid_credentials() {
    let mut harness = Harness::new();
    harness.users.expect_find_by_id().returning(|_| Ok(None));
    let credentials = LoginCredentials::try_from_parts("ghost", "secret").expect("shape");
    let error = harness.build().login(&credentials).await.expect_err("unknown");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[tokio::test]
async fn login_issues_token_with_profile() {
    let mut harness = Harness::new()
        .with_user(fixture_user("giran_fan"))
        .hasher_accepts("secret");
    harness.tokens.expect_issue().times(1).returning(|user, now| {
        Ok(AccessToken {
            token: format!("token-for-{}", user.user_id),
            expires_at: now + TimeDelta::hours(24),
        })
    });
    let credentials = LoginCredentials::try_from_parts("giran_fan", "secret").expect("shape");
    let outcome = harness.build().login(&credentials).await.expect("login");
    assert_eq!(outcome.token.token, "token-for-giran_fan");
    assert_eq!(outcome.user.user_id.as_ref(), "giran_fan");

    let body = serde_json::to_value(&outcome).expect("serialise");
    assert!(body.get("expiresAt").is_some());
    assert!(body["user"].get("passwordHash").is_none());
}

fn claims_for(user_id: &str) -> TokenClaims {
    TokenClaims {
        user_id: id(user_id),
        is_admin: false,
        issued_at: fixture_timestamp(),
        expires_at: fixture_timestamp() + TimeDelta::hours(1),
    }
}

#[rstest]
#[case::missing(None, ErrorCode::Unauthorized)]
#[case::deleted(Some(User { deleted: true, ..fixture_user("giran_fan") }), ErrorCode::Unauthorized)]
#[case::suspended(
    Some(User { suspended: true, ..fixture_user("giran_fan") }),
    ErrorCode::Forbidden
)]
#[tokio::test]
async fn authenticate_checks_current_account_state(
    #[case] stored: Option<User>,
    #[case] code: ErrorCode,
) {
    let mut harness = Harness::new();
    harness
        .tokens
        .expect_verify()
        .returning(|_, _| Ok(claims_for("giran_fan")));
    harness
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(stored.clone()));
    let error = harness.build().authenticate("jwt").await.expect_err("rejected");
    assert_eq!(error.code(), code);
}

#[tokio::test]
async fn authenticate_maps_expired_tokens_to_unauthorized() {
    let mut harness = Harness::new();
    harness
        .tokens
        .expect_verify()
        .returning(|_, _| Err(TokenError::expired()));
    let error = harness.build().authenticate("jwt").await.expect_err("expired");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn update_profile_is_limited_to_self_or_admin() {
    let service = Harness::new().with_user(fixture_user("target")).build();
    let update = ProfileUpdate::try_from_parts(Some("New"), None, None).expect("valid");
    let error = service
        .update_profile(&fixture_user("intruder"), &id("target"), update)
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn admins_may_update_other_profiles() {
    let mut harness = Harness::new().with_user(fixture_user("target"));
    harness.users.expect_save().times(1).returning(|_| Ok(()));
    let update = ProfileUpdate::try_from_parts(Some("Renamed"), None, None).expect("valid");
    let profile = harness
        .build()
        .update_profile(&fixture_admin("boss"), &id("target"), update)
        .await
        .expect("updated");
    assert_eq!(profile.name, "Renamed");
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let service = Harness::new()
        .with_user(fixture_user("giran_fan"))
        .hasher_accepts("current-pass")
        .build();
    let error = service
        .change_password(
            &fixture_user("giran_fan"),
            &id("giran_fan"),
            &Password::unchecked("wrong-pass"),
            &Password::new("newPassword", "brand-new-pass").expect("valid"),
        )
        .await
        .expect_err("wrong current password");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn change_password_stores_new_hash() {
    let mut harness = Harness::new()
        .with_user(fixture_user("giran_fan"))
        .hasher_accepts("current-pass");
    harness
        .hasher
        .expect_hash()
        .returning(|password| Ok(format!("hashed:{}", password.expose())));
    harness
        .users
        .expect_save()
        .withf(|user| user.password_hash == "hashed:brand-new-pass")
        .times(1)
        .returning(|_| Ok(()));
    harness
        .build()
        .change_password(
            &fixture_user("giran_fan"),
            &id("giran_fan"),
            &Password::unchecked("current-pass"),
            &Password::new("newPassword", "brand-new-pass").expect("valid"),
        )
        .await
        .expect("changed");
}

#[tokio::test]
async fn delete_soft_deletes() {
    let mut harness = Harness::new().with_user(fixture_user("giran_fan"));
    harness
        .users
        .expect_save()
        .withf(|user| user.deleted)
        .times(1)
        .returning(|_| Ok(()));
    harness
        .build()
        .delete(&fixture_user("giran_fan"), &id("giran_fan"))
        .await
        .expect("deleted");
}

#[tokio::test]
async fn profile_hides_deleted_accounts() {
    let service = Harness::new()
        .with_user(User {
            deleted: true,
            ..fixture_user("gone")
        })
        .build();
    let error = service.profile(&id("gone")).await.expect_err("hidden");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn admins_cannot_revoke_their_own_role() {
    let service = Harness::new().build();
    let error = service
        .set_admin(&fixture_admin("boss"), &id("boss"), false)
        .await
        .expect_err("self revoke");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn list_all_includes_deleted_accounts_sorted_by_id() {
    let mut harness = Harness::new();
    harness.users.expect_list().returning(|| {
        Ok(vec![
            fixture_user("zeta"),
            User {
                deleted: true,
                ..fixture_user("alpha")
            },
        ])
    });
    let profiles = harness.build().list_all().await.expect("listed");
    let ids: Vec<&str> = profiles.iter().map(|p| p.user_id.as_ref()).collect();
    assert_eq!(ids, ["alpha", "zeta"]);
}

#[tokio::test]
async fn ensure_admin_creates_missing_account() {
    let mut harness = Harness::new();
    harness.users.expect_find_by_id().returning(|_| Ok(None));
    harness.hasher.expect_hash().returning(|_| Ok("hash".to_owned()));
    harness
        .users
        .expect_create()
        .withf(|user| user.is_admin && user.user_id.as_ref() == "admin")
        .times(1)
        .returning(|_| Ok(()));
    harness
        .build()
        .ensure_admin(BootstrapAdmin {
            user_id: id("admin"),
            password: Password::unchecked("admin-password"),
        })
        .await
        .expect("bootstrapped");
}

#[tokio::test]
async fn ensure_admin_leaves_existing_accounts_alone() {
    let mut harness = Harness::new().with_user(fixture_user("admin"));
    harness.users.expect_create().never();
    harness
        .build()
        .ensure_admin(BootstrapAdmin {
            user_id: id("admin"),
            password: Password::unchecked("admin-password"),
        })
        .await
        .expect("no-op");
}

#[tokio::test]
async fn hashing_failures_surface_as_internal_errors() {
    let mut harness = Harness::new();
    harness
        .hasher
        .expect_hash()
        .returning(|_| Err(PasswordHashError::hashing("worker cancelled")));
    let registration =
        Registration::try_from_parts("giran_fan", "Kita Taro", "password1").expect("valid");
    let error = harness.build().register(registration).await.expect_err("hash failed");
    assert_eq!(error.code(), ErrorCode::InternalError);
}
