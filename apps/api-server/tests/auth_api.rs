mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use api_server::config::AppConfig;
use postly_infra::RateLimitConfig;

use common::*;

#[actix_web::test]
async fn register_returns_envelope_with_user() {
    let state = state();

    let (status, body) = register(&state, "Ada", "Ada@Example.com").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["name"], "Ada");
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn register_rejects_taken_email() {
    let state = state();
    register(&state, "Ada", "ada@example.com").await;

    let (status, body) = register(&state, "Other", "ADA@example.com").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["email"][0], "The email has already been taken.");
}

#[actix_web::test]
async fn register_reports_field_errors() {
    let state = state();

    let (status, body) = send(
        &state,
        test::TestRequest::post().uri("/api/register").set_json(json!({
            "email": "not-an-email",
            "password": "short",
            "password_confirmation": "short",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert!(body["error"]["name"].is_array());
    assert!(body["error"]["email"].is_array());
    assert!(body["error"]["password"].is_array());
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let state = state();

    let (status, body) = send(
        &state,
        test::TestRequest::post()
            .uri("/api/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"name\": "),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["body"].is_array());
}

#[actix_web::test]
async fn login_issues_token_and_rejects_bad_password() {
    let state = state();
    register(&state, "Ada", "ada@example.com").await;

    let (status, body) = login(&state, "ada@example.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");

    let (status, body) = login(&state, "nobody@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");

    let (status, body) = login(&state, "ada@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "User logged in successfully");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let state = state();

    let (status, body) = send(&state, test::TestRequest::get().uri("/api/posts")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Unauthenticated.");
}

#[actix_web::test]
async fn logout_revokes_only_the_presented_token() {
    let state = state();
    let first = user_token(&state, "ada@example.com").await;
    let (_, body) = login(&state, "ada@example.com", PASSWORD).await;
    let second = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &state,
        authed(test::TestRequest::post().uri("/api/logout"), &first),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "User logged out successfully");

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts"), &first),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Token revoked.");

    let (status, _) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts"), &second),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn credential_endpoints_are_throttled() {
    let state = state_with(AppConfig {
        auth_rate_limit: RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        },
        ..AppConfig::default()
    });

    for _ in 0..2 {
        let (status, _) = login(&state, "ada@example.com", PASSWORD).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, headers, body) = send_full(
        &state,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "ada@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert!(headers.contains_key("retry-after"));
}

#[actix_web::test]
async fn health_is_public_and_tagged_with_request_id() {
    let state = state();

    let (status, headers, body) =
        send_full(&state, test::TestRequest::get().uri("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "ok");
    let header = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(body["result"]["request_id"], header);
}

#[actix_web::test]
async fn unknown_routes_use_the_envelope() {
    let state = state();

    let (status, body) = send(&state, test::TestRequest::get().uri("/api/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
