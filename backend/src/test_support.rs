//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::Trace;
use crate::domain::ports::{PasswordHashError, PasswordHasher, TokenService};
use crate::domain::{Match, MatchDraft, Password, User, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::Repositories;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::JwtTokenService;

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant used by fixtures: 2026-04-01 00:00 UTC.
pub fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).single() {
        Some(at) => at,
        None => panic!("valid fixture timestamp"),
    }
}

/// Active, non-admin account with a placeholder hash.
pub fn fixture_user(id: &str) -> User {
    let user_id = match UserId::new(id) {
        Ok(user_id) => user_id,
        Err(error) => panic!("fixture user id {id:?}: {error}"),
    };
    let at = fixture_timestamp();
    User {
        name: format!("{id} name"),
        user_id,
        password_hash: format!("hash:{id}"),
        is_admin: false,
        suspended: false,
        deleted: false,
        favorite_player: None,
        bio: None,
        created_at: at,
        updated_at: at,
    }
}

/// Active administrator account.
pub fn fixture_admin(id: &str) -> User {
    User {
        is_admin: true,
        ..fixture_user(id)
    }
}

/// Reversible "hash" for fast tests: `hash:<password>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        Ok(format!("hash:{}", password.expose()))
    }

    async fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHashError> {
        let stored = hash
            .strip_prefix("hash:")
            .ok_or_else(|| PasswordHashError::malformed_hash("missing hash: prefix"))?;
        Ok(stored == password.expose())
    }
}

/// Full HTTP stack over the in-memory store, with a controllable clock.
pub struct TestBackend {
    pub repos: Repositories,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
    tokens: Arc<JwtTokenService>,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBackend {
    pub fn new() -> Self {
        let repos = Arc::new(InMemoryStore::new()).repositories();
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        let tokens = Arc::new(JwtTokenService::new(
            &Zeroizing::new(b"giravent-test-secret".to_vec()),
            TimeDelta::hours(24),
        ));
        let state = HttpState::new(
            &repos,
            HttpStatePorts {
                hasher: Arc::new(PlainPasswordHasher),
                tokens: tokens.clone(),
                clock: clock.clone(),
            },
        );
        Self {
            repos,
            clock,
            state,
            tokens,
        }
    }

    /// The application as the server builds it, minus health probes.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .configure(configure)
    }

    /// Store `user` directly, bypassing registration.
    pub async fn seed_user(&self, user: &User) {
        if let Err(error) = self.repos.users.save(user).await {
            panic!("seeding {}: {error}", user.user_id);
        }
    }

    /// Store an active fixture kicking off at 14:00 club time on `date`.
    pub async fn seed_match(&self, opponent: &str, date: &str) -> Match {
        let fixture = match MatchDraft::try_from_parts(opponent, date, "14:00", "Mikuni") {
            Ok(draft) => draft.into_match(self.clock.utc()),
            Err(error) => panic!("fixture draft for {opponent}: {error}"),
        };
        if let Err(error) = self.repos.matches.save(&fixture).await {
            panic!("seeding match {}: {error}", fixture.match_id);
        }
        fixture
    }

    /// `Authorization` header value for `user`, valid at the current clock.
    pub fn bearer(&self, user: &User) -> String {
        match self.tokens.issue(user, self.clock.utc()) {
            Ok(token) => format!("Bearer {}", token.token),
            Err(error) => panic!("issuing token for {}: {error}", user.user_id),
        }
    }

    /// Send `req` through a fresh app; the body is decoded as JSON, `Null`
    /// when empty.
    pub async fn call(&self, req: TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(self.app()).await;
        let res = actix_test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let bytes = actix_test::read_body(res).await;
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        match serde_json::from_slice(&bytes) {
            Ok(body) => (status, body),
            Err(error) => panic!("response body is not JSON: {error}"),
        }
    }
}
