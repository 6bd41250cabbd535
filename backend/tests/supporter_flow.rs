//! End-to-end HTTP flow for a matchday: a supporter registers, checks in,
//! reviews the match and chats afterwards until the room closes.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::TestRequest;
use chrono::TimeDelta;
use giravent::test_support::{TestBackend, fixture_admin};
use rstest::rstest;
use serde_json::{Value, json};

fn text<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing {pointer} in {body}"))
}

async fn register(backend: &TestBackend, user_id: &str, password: &str) {
    let (registered, _) = backend
        .call(TestRequest::post().uri("/users").set_json(json!({
            "userId": user_id,
            "name": "Kita Taro",
            "password": password,
        })))
        .await;
    assert_eq!(registered, StatusCode::OK);
}

async fn login(backend: &TestBackend, user_id: &str, password: &str) -> String {
    let (status, body) = backend
        .call(
            TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"userId": user_id, "password": password})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body, "/user/userId"), user_id);
    format!("Bearer {}", text(&body, "/token"))
}

#[rstest]
#[actix_web::test]
async fn matchday_from_registration_to_closed_chat() {
    let backend = TestBackend::new();
    let admin = fixture_admin("club_admin");
    backend.seed_user(&admin).await;
    let admin_bearer = backend.bearer(&admin);
    register(&backend, "giran_fan", "kokura-2026").await;
    let fan = login(&backend, "giran_fan", "kokura-2026").await;

    let (created, fixture) = backend
        .call(
            TestRequest::post()
                .uri("/matches")
                .insert_header((AUTHORIZATION, admin_bearer.clone()))
                .set_json(json!({
                    "opponent": "Kataller Toyama",
                    "date": "2026-04-12",
                    "time": "14:00",
                    "venue": "Mikuni World Stadium Kitakyushu",
                })),
        )
        .await;
    assert_eq!(created, StatusCode::OK);
    let match_id = text(&fixture, "/matchId").to_owned();

    let (checked_in, _) = backend
        .call(
            TestRequest::put()
                .uri(&format!("/matches/{match_id}/checkin"))
                .insert_header((AUTHORIZATION, fan.clone()))
                .set_json(json!({"checkedIn": true})),
        )
        .await;
    let (_, attendees) = backend
        .call(
            TestRequest::get()
                .uri(&format!("/matches/{match_id}/checkins"))
                .insert_header((AUTHORIZATION, fan.clone())),
        )
        .await;
    assert_eq!(checked_in, StatusCode::OK);
    assert_eq!(attendees.get("count").and_then(Value::as_u64), Some(1));

    let (reviewed, _) = backend
        .call(
            TestRequest::post()
                .uri(&format!("/matches/{match_id}/reviews"))
                .insert_header((AUTHORIZATION, fan.clone()))
                .set_json(json!({"rating": 4, "comment": "Late winner"})),
        )
        .await;
    let (again, _) = backend
        .call(
            TestRequest::post()
                .uri(&format!("/matches/{match_id}/reviews"))
                .insert_header((AUTHORIZATION, fan.clone()))
                .set_json(json!({"rating": 5})),
        )
        .await;
    assert_eq!(reviewed, StatusCode::OK);
    assert_eq!(again, StatusCode::CONFLICT);

    let (opened, chat) = backend
        .call(
            TestRequest::post()
                .uri("/chats")
                .insert_header((AUTHORIZATION, admin_bearer))
                .set_json(json!({"matchId": match_id})),
        )
        .await;
    assert_eq!(opened, StatusCode::OK);
    assert_eq!(text(&chat, "/name"), "vs Kataller Toyama");
    assert_eq!(chat.get("open").and_then(Value::as_bool), Some(true));
    let messages_uri = format!("/chats/{}/messages", text(&chat, "/chatId"));

    let (posted, message) = backend
        .call(
            TestRequest::post()
                .uri(&messages_uri)
                .insert_header((AUTHORIZATION, fan.clone()))
                .set_json(json!({"text": "What a finish!"})),
        )
        .await;
    assert_eq!(posted, StatusCode::OK);
    assert_eq!(text(&message, "/userName"), "Kita Taro");

    // Kickoff is 05:00 UTC on the 12th; the room stays open for a day.
    backend.clock.advance(TimeDelta::days(13));
    let fan = login(&backend, "giran_fan", "kokura-2026").await;
    let (late, error) = backend
        .call(
            TestRequest::post()
                .uri(&messages_uri)
                .insert_header((AUTHORIZATION, fan.clone()))
                .set_json(json!({"text": "Anyone still here?"})),
        )
        .await;
    let (_, history) = backend
        .call(
            TestRequest::get()
                .uri(&messages_uri)
                .insert_header((AUTHORIZATION, fan)),
        )
        .await;

    assert_eq!(late, StatusCode::CONFLICT);
    assert_eq!(error.get("code").and_then(Value::as_str), Some("conflict"));
    assert_eq!(history.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn responses_carry_a_trace_id() {
    let backend = TestBackend::new();
    let app = actix_web::test::init_service(backend.app()).await;

    let response = actix_web::test::call_service(
        &app,
        TestRequest::get().uri("/auth/me").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response
            .headers()
            .contains_key(giravent::domain::TRACE_ID_HEADER)
    );
}
