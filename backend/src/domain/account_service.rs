//! Supporter accounts: registration, login, bearer authentication, profile
//! maintenance and the administrator's account controls.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::ports::{PasswordHasher, RepositoryError, TokenService, UserRepository};
use crate::domain::{
    AccessToken, Error, LoginCredentials, Password, ProfileUpdate, Registration, User, UserId,
    UserProfile,
};

/// Successful login response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    #[serde(flatten)]
    pub token: AccessToken,
    pub user: UserProfile,
}

/// Administrator account created at start-up when it does not exist yet.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub user_id: UserId,
    pub password: Password,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("invalid credentials")
    }

    fn suspended() -> Error {
        Error::forbidden("account is suspended")
    }

    /// Load an account that has not been deleted, or fail with 404.
    async fn visible_user(&self, user_id: &UserId) -> Result<User, Error> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if !user.deleted => Ok(user),
            _ => Err(Error::not_found(format!("user {user_id} not found"))),
        }
    }

    async fn existing_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    fn ensure_self_or_admin(actor: &User, target: &UserId) -> Result<(), Error> {
        if &actor.user_id == target || actor.is_admin {
            Ok(())
        } else {
            Err(Error::forbidden("you may only modify your own account"))
        }
    }

    /// Create an account. Taken ids, including soft-deleted ones, yield 409.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let password_hash = self.hasher.hash(&registration.password).await?;
        let now = self.clock.utc();
        let user = User {
            user_id: registration.user_id,
            name: registration.name,
            password_hash,
            is_admin: false,
            suspended: false,
            deleted: false,
            favorite_player: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await.map_err(|error| match error {
            RepositoryError::AlreadyExists { .. } => {
                Error::conflict(format!("userId {} is already taken", user.user_id))
            }
            other => other.into(),
        })?;
        info!(user_id = %user.user_id, "account registered");
        Ok(user.profile())
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown ids, deleted accounts and wrong passwords are indistinguishable
    /// to the caller. Suspension is only revealed after the password matched.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(user) = self.users.find_by_id(credentials.user_id()).await? else {
            return Err(Self::invalid_credentials());
        };
        if user.deleted {
            return Err(Self::invalid_credentials());
        }
        if !self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await?
        {
            return Err(Self::invalid_credentials());
        }
        if user.suspended {
            return Err(Self::suspended());
        }
        let token = self.tokens.issue(&user, self.clock.utc())?;
        Ok(LoginOutcome {
            token,
            user: user.profile(),
        })
    }

    /// Resolve a bearer token to the current state of its account.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let claims = self.tokens.verify(token, self.clock.utc())?;
        let user = self
            .users
            .find_by_id(&claims.user_id)
            .await?
            .filter(|user| !user.deleted)
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        if user.suspended {
            return Err(Self::suspended());
        }
        Ok(user)
    }

    pub async fn profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        Ok(self.visible_user(user_id).await?.profile())
    }

    pub async fn update_profile(
        &self,
        actor: &User,
        target: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        Self::ensure_self_or_admin(actor, target)?;
        let mut user = self.visible_user(target).await?;
        update.apply(&mut user, self.clock.utc());
        self.users.save(&user).await?;
        Ok(user.profile())
    }

    /// Change the caller's own password after re-checking the current one.
    pub async fn change_password(
        &self,
        actor: &User,
        target: &UserId,
        current: &Password,
        new: &Password,
    ) -> Result<(), Error> {
        if &actor.user_id != target {
            return Err(Error::forbidden("you may only change your own password"));
        }
        let mut user = self.visible_user(target).await?;
        if !self.hasher.verify(current, &user.password_hash).await? {
            return Err(Error::unauthorized("current password is incorrect"));
        }
        user.password_hash = self.hasher.hash(new).await?;
        user.updated_at = self.clock.utc();
        self.users.save(&user).await?;
        info!(user_id = %user.user_id, "password changed");
        Ok(())
    }

    /// Soft-delete an account. The id stays reserved.
    pub async fn delete(&self, actor: &User, target: &UserId) -> Result<(), Error> {
        Self::ensure_self_or_admin(actor, target)?;
        let mut user = self.visible_user(target).await?;
        user.deleted = true;
        user.updated_at = self.clock.utc();
        self.users.save(&user).await?;
        info!(user_id = %user.user_id, actor = %actor.user_id, "account deleted");
        Ok(())
    }

    /// Every account, deleted ones included, ordered by id.
    pub async fn list_all(&self) -> Result<Vec<UserProfile>, Error> {
        let mut users = self.users.list().await?;
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users.iter().map(User::profile).collect())
    }

    pub async fn set_suspended(
        &self,
        actor: &User,
        target: &UserId,
        suspended: bool,
    ) -> Result<UserProfile, Error> {
        let mut user = self.existing_user(target).await?;
        user.suspended = suspended;
        user.updated_at = self.clock.utc();
        self.users.save(&user).await?;
        info!(user_id = %target, actor = %actor.user_id, suspended, "suspension changed");
        Ok(user.profile())
    }

    /// Grant or revoke the admin flag. Admins cannot revoke their own.
    pub async fn set_admin(
        &self,
        actor: &User,
        target: &UserId,
        is_admin: bool,
    ) -> Result<UserProfile, Error> {
        if &actor.user_id == target && !is_admin {
            return Err(Error::invalid_request(
                "administrators cannot revoke their own admin role",
            ));
        }
        let mut user = self.existing_user(target).await?;
        user.is_admin = is_admin;
        user.updated_at = self.clock.utc();
        self.users.save(&user).await?;
        info!(user_id = %target, actor = %actor.user_id, is_admin, "admin role changed");
        Ok(user.profile())
    }

    /// Create the configured administrator when the id is free.
    ///
    /// An existing account with that id is left untouched.
    pub async fn ensure_admin(&self, admin: BootstrapAdmin) -> Result<(), Error> {
        if let Some(existing) = self.users.find_by_id(&admin.user_id).await? {
            if !existing.is_admin {
                warn!(
                    user_id = %existing.user_id,
                    "bootstrap admin id belongs to a non-admin account; leaving it unchanged"
                );
            }
            return Ok(());
        }
        let now = self.clock.utc();
        let user = User {
            name: admin.user_id.to_string(),
            user_id: admin.user_id,
            password_hash: self.hasher.hash(&admin.password).await?,
            is_admin: true,
            suspended: false,
            deleted: false,
            favorite_player: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        match self.users.create(&user).await {
            Ok(()) => {
                info!(user_id = %user.user_id, "bootstrap admin created");
                Ok(())
            }
            // Another instance won the race.
            Err(RepositoryError::AlreadyExists { .. }) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
