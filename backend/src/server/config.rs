//! Runtime settings loaded via OrthoConfig.
//!
//! Every field can come from a `--flag`, a `GIRAVENT_*` environment variable
//! or a config file. Accessors apply defaults and validation so the rest of
//! start-up only sees typed values.

use std::env;

use chrono::TimeDelta;
use giravent::domain::{BootstrapAdmin, Password, UserId};
use giravent::outbound::dynamodb::DynamoSettings;
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TABLE_PREFIX: &str = "giravent";
const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const EPHEMERAL_SECRET_BYTES: usize = 32;
const BCRYPT_MIN_COST: u32 = 4;
const BCRYPT_MAX_COST: u32 = 31;
/// Set to `1` to allow a generated signing secret in release builds.
pub const ALLOW_EPHEMERAL_SECRET_ENV: &str = "GIRAVENT_ALLOW_EPHEMERAL_SECRET";

/// Socket the HTTP server binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl From<&Settings> for ServerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
        }
    }
}

/// Which repository adapters to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    /// Process-local maps; data is lost on restart.
    Memory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown storage backend {0:?}; expected `dynamodb` or `memory`")]
    UnknownStorage(String),
    #[error("jwt_ttl_hours must be positive, got {0}")]
    InvalidTtl(i64),
    #[error("bcrypt_cost must be between {BCRYPT_MIN_COST} and {BCRYPT_MAX_COST}, got {cost}")]
    InvalidBcryptCost { cost: u32 },
    #[error(
        "GIRAVENT_JWT_SECRET is required in release builds \
         (set {ALLOW_EPHEMERAL_SECRET_ENV}=1 to generate one)"
    )]
    MissingJwtSecret,
    #[error("admin_user_id and admin_password must be set together")]
    IncompleteAdmin,
    #[error("invalid bootstrap admin: {0}")]
    InvalidAdmin(String),
}

/// Server settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GIRAVENT")]
pub struct Settings {
    /// Interface to bind.
    #[ortho_config(default = DEFAULT_HOST.to_owned())]
    pub host: String,
    /// Port to bind.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// `dynamodb` (default) or `memory`.
    pub storage: Option<String>,
    /// Table names are `<prefix>-<entity>`.
    pub table_prefix: Option<String>,
    /// Endpoint override, e.g. DynamoDB Local.
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    pub jwt_ttl_hours: Option<i64>,
    pub bcrypt_cost: Option<u32>,
    /// Administrator created at start-up when the id is free.
    pub admin_user_id: Option<String>,
    pub admin_password: Option<String>,
}

impl Settings {
    pub fn storage(&self) -> Result<StorageBackend, SettingsError> {
        match self.storage.as_deref().map(str::trim) {
            None => Ok(StorageBackend::DynamoDb),
            Some(raw) if raw.eq_ignore_ascii_case("dynamodb") => Ok(StorageBackend::DynamoDb),
            Some(raw) if raw.eq_ignore_ascii_case("memory") => Ok(StorageBackend::Memory),
            Some(other) => Err(SettingsError::UnknownStorage(other.to_owned())),
        }
    }

    #[must_use]
    pub fn dynamo(&self) -> DynamoSettings {
        DynamoSettings {
            table_prefix: self
                .table_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_TABLE_PREFIX.to_owned()),
            endpoint_url: self.dynamodb_endpoint.clone(),
            region: self.aws_region.clone(),
        }
    }

    pub fn jwt_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.jwt_ttl_hours.unwrap_or(DEFAULT_JWT_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::InvalidTtl(hours));
        }
        TimeDelta::try_hours(hours).ok_or(SettingsError::InvalidTtl(hours))
    }

    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if (BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::InvalidBcryptCost { cost })
        }
    }

    /// The configured signing secret, or a random one when permitted.
    pub fn jwt_secret(&self, allow_ephemeral: bool) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|secret| !secret.is_empty()) {
            Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            None if allow_ephemeral => {
                warn!(
                    "GIRAVENT_JWT_SECRET is not set; using a random secret, \
                     tokens will not survive a restart"
                );
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_BYTES]);
                rand::thread_rng().fill_bytes(&mut secret);
                Ok(secret)
            }
            None => Err(SettingsError::MissingJwtSecret),
        }
    }

    pub fn bootstrap_admin(&self) -> Result<Option<BootstrapAdmin>, SettingsError> {
        match (self.admin_user_id.as_deref(), self.admin_password.as_deref()) {
            (None, None) => Ok(None),
            (Some(user_id), Some(password)) => {
                let invalid = |error: giravent::domain::Error| {
                    SettingsError::InvalidAdmin(error.message().to_owned())
                };
                Ok(Some(BootstrapAdmin {
                    user_id: UserId::new(user_id.trim()).map_err(invalid)?,
                    password: Password::new("adminPassword", password).map_err(invalid)?,
                }))
            }
            _ => Err(SettingsError::IncompleteAdmin),
        }
    }
}

/// Debug builds, or release builds with the opt-in variable set to `1`.
#[must_use]
pub fn ephemeral_secret_allowed() -> bool {
    cfg!(debug_assertions)
        || env::var(ALLOW_EPHEMERAL_SECRET_ENV).is_ok_and(|value| value.trim() == "1")
}
