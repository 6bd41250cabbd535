//! Builders wiring configured adapters into the HTTP state.

use std::sync::Arc;

use giravent::inbound::http::state::{HttpState, HttpStatePorts};
use giravent::outbound::memory::InMemoryStore;
use giravent::outbound::security::{BcryptPasswordHasher, JwtTokenService};
use giravent::outbound::{Repositories, dynamodb};
use mockable::DefaultClock;
use tracing::{info, warn};

use super::config::{Settings, SettingsError, StorageBackend, ephemeral_secret_allowed};

async fn build_repositories(settings: &Settings) -> Result<Repositories, SettingsError> {
    match settings.storage()? {
        StorageBackend::DynamoDb => {
            let dynamo = settings.dynamo();
            let client = dynamodb::connect(&dynamo).await;
            info!(table_prefix = %dynamo.table_prefix, "using DynamoDB storage");
            Ok(dynamodb::repositories(&client, &dynamo))
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; data will not survive a restart");
            Ok(Arc::new(InMemoryStore::new()).repositories())
        }
    }
}

/// Validate settings and build every service the handlers need.
///
/// # Errors
/// Returns [`SettingsError`] when a setting is missing or out of range.
pub async fn build_http_state(settings: &Settings) -> Result<HttpState, SettingsError> {
    let secret = settings.jwt_secret(ephemeral_secret_allowed())?;
    let ports = HttpStatePorts {
        hasher: Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost()?)),
        tokens: Arc::new(JwtTokenService::new(&secret, settings.jwt_ttl()?)),
        clock: Arc::new(DefaultClock),
    };
    let repositories = build_repositories(settings).await?;
    Ok(HttpState::new(&repositories, ports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use giravent::domain::{LoginCredentials, Registration};
    use ortho_config::OrthoConfig;
    use rstest::rstest;

    fn memory_settings() -> Settings {
        let _guard = lock_env([
            ("GIRAVENT_STORAGE", Some("memory".to_owned())),
            ("GIRAVENT_JWT_SECRET", Some("state-builder-secret".to_owned())),
            ("GIRAVENT_BCRYPT_COST", Some("4".to_owned())),
            ("GIRAVENT_JWT_TTL_HOURS", None::<String>),
            ("GIRAVENT_ADMIN_USER_ID", None::<String>),
            ("GIRAVENT_ADMIN_PASSWORD", None::<String>),
        ]);
        Settings::load_from_iter([OsString::from("giravent")]).expect("config should load")
    }

    #[rstest]
    #[actix_web::test]
    async fn memory_state_supports_register_then_login() {
        let state = build_http_state(&memory_settings())
            .await
            .expect("state should build");
        let registration = Registration::try_from_parts("giran_fan", "Giran Fan", "kokura-2026")
            .expect("valid registration");

        state
            .accounts
            .register(registration)
            .await
            .expect("registration succeeds");
        let credentials =
            LoginCredentials::try_from_parts("giran_fan", "kokura-2026").expect("credentials");
        let outcome = state
            .accounts
            .login(&credentials)
            .await
            .expect("login succeeds");

        assert_eq!(outcome.user.user_id.as_ref(), "giran_fan");
    }
}
