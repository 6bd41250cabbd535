//! Behaviour tests for the watch-together matching endpoints.
//!
//! Steps are synchronous, so the world owns a current-thread runtime and a
//! `LocalSet` to drive the in-memory backend.

use std::cell::RefCell;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use giravent::domain::{Match, User};
use giravent::test_support::{TestBackend, fixture_user};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

struct MatchingWorld {
    runtime: Runtime,
    local: LocalSet,
    backend: TestBackend,
    fixture: Match,
    host: User,
    guest: User,
    other: User,
    recruitment_id: RefCell<Option<String>>,
    request_id: RefCell<Option<String>>,
    last: RefCell<Option<(StatusCode, Value)>>,
}

impl MatchingWorld {
    fn send(&self, as_user: &User, req: TestRequest) -> (StatusCode, Value) {
        let req = req.insert_header((AUTHORIZATION, self.backend.bearer(as_user)));
        let response = self.local.block_on(&self.runtime, self.backend.call(req));
        self.last.replace(Some(response.clone()));
        response
    }

    fn recruitment_id(&self) -> String {
        self.recruitment_id
            .borrow()
            .clone()
            .expect("recruitment opened")
    }

    fn request_id(&self) -> String {
        self.request_id.borrow().clone().expect("request sent")
    }

    fn last(&self) -> (StatusCode, Value) {
        self.last.borrow().clone().expect("a request was sent")
    }

    fn ask_to_join(&self, as_user: &User) -> (StatusCode, Value) {
        let uri = format!("/matching/recruitments/{}/requests", self.recruitment_id());
        self.send(
            as_user,
            TestRequest::post()
                .uri(&uri)
                .set_json(json!({"message": "Room for one more?"})),
        )
    }

    fn respond(&self, as_user: &User, status: &str) {
        let uri = format!("/matching/requests/{}", self.request_id());
        self.send(
            as_user,
            TestRequest::put().uri(&uri).set_json(json!({"status": status})),
        );
    }
}

#[fixture]
fn world() -> MatchingWorld {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let backend = TestBackend::new();
    let host = fixture_user("host_fan");
    let guest = fixture_user("guest_fan");
    let other = fixture_user("late_fan");
    let fixture = local.block_on(&runtime, async {
        for user in [&host, &guest, &other] {
            backend.seed_user(user).await;
        }
        backend.seed_match("Kataller Toyama", "2026-04-12").await
    });

    MatchingWorld {
        runtime,
        local,
        backend,
        fixture,
        host,
        guest,
        other,
        recruitment_id: RefCell::new(None),
        request_id: RefCell::new(None),
        last: RefCell::new(None),
    }
}

#[given("the host opened a recruitment for {capacity} supporters")]
fn the_host_opened_a_recruitment(world: &MatchingWorld, capacity: i64) {
    let (status, body) = world.send(
        &world.host,
        TestRequest::post()
            .uri("/matching/recruitments")
            .set_json(json!({
                "matchId": world.fixture.match_id.as_ref(),
                "title": "Watch from the home end",
                "capacity": capacity,
            })),
    );
    assert_eq!(status, StatusCode::OK, "unexpected body {body}");
    let id = body
        .get("recruitmentId")
        .and_then(Value::as_str)
        .expect("recruitment id");
    world.recruitment_id.replace(Some(id.to_owned()));
}

#[given("the guest asked to join")]
fn the_guest_asked_to_join(world: &MatchingWorld) {
    let (status, body) = world.ask_to_join(&world.guest);
    assert_eq!(status, StatusCode::OK, "unexpected body {body}");
    let id = body
        .get("requestId")
        .and_then(Value::as_str)
        .expect("request id");
    world.request_id.replace(Some(id.to_owned()));
}

#[when("the guest asks to join")]
fn the_guest_asks_to_join(world: &MatchingWorld) {
    world.ask_to_join(&world.guest);
}

#[when("another supporter asks to join")]
fn another_supporter_asks_to_join(world: &MatchingWorld) {
    world.ask_to_join(&world.other);
}

#[when("the host approves the request")]
fn the_host_approves_the_request(world: &MatchingWorld) {
    world.respond(&world.host, "approved");
}

#[when("the host rejects the request")]
fn the_host_rejects_the_request(world: &MatchingWorld) {
    world.respond(&world.host, "rejected");
}

#[when("another supporter approves the request")]
fn another_supporter_approves_the_request(world: &MatchingWorld) {
    world.respond(&world.other, "approved");
}

#[when("the guest cancels the request")]
fn the_guest_cancels_the_request(world: &MatchingWorld) {
    let uri = format!("/matching/requests/{}", world.request_id());
    world.send(&world.guest, TestRequest::delete().uri(&uri));
}

#[when("the host closes the recruitment")]
fn the_host_closes_the_recruitment(world: &MatchingWorld) {
    let uri = format!("/matching/recruitments/{}/status", world.recruitment_id());
    world.send(
        &world.host,
        TestRequest::put().uri(&uri).set_json(json!({"status": "closed"})),
    );
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &MatchingWorld, status: u16) {
    let (actual, body) = world.last();
    assert_eq!(actual.as_u16(), status, "unexpected body {body}");
}

#[then("the request is {status}")]
fn the_request_is(world: &MatchingWorld, status: String) {
    let (_, body) = world.last();
    assert_eq!(
        body.get("status").and_then(Value::as_str),
        Some(status.as_str())
    );
}

#[then("the recruitment is {status}")]
fn the_recruitment_is(world: &MatchingWorld, status: String) {
    let uri = format!("/matching/recruitments/{}", world.recruitment_id());
    let (_, body) = world.send(&world.guest, TestRequest::get().uri(&uri));
    assert_eq!(
        body.get("status").and_then(Value::as_str),
        Some(status.as_str())
    );
}

#[then("the guest has {count} sent requests")]
fn the_guest_has_sent_requests(world: &MatchingWorld, count: usize) {
    let (status, body) = world.send(
        &world.guest,
        TestRequest::get().uri("/matching/requests/sent"),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(count));
}

#[scenario(
    path = "tests/features/matching.feature",
    name = "Approving the last seat closes the recruitment"
)]
fn approving_the_last_seat_closes_the_recruitment(world: MatchingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/matching.feature",
    name = "A rejected supporter may ask again"
)]
fn a_rejected_supporter_may_ask_again(world: MatchingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/matching.feature",
    name = "Withdrawn requests cannot be answered"
)]
fn withdrawn_requests_cannot_be_answered(world: MatchingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/matching.feature",
    name = "Only the recruiter may answer a request"
)]
fn only_the_recruiter_may_answer_a_request(world: MatchingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/matching.feature",
    name = "Closed recruitments refuse new requests"
)]
fn closed_recruitments_refuse_new_requests(world: MatchingWorld) {
    drop(world);
}
