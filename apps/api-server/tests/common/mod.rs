#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use api_server::config::AppConfig;
use api_server::configure_app;
use api_server::middleware::error::not_found;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;

pub const PASSWORD: &str = "correct-horse-battery";

pub fn state() -> AppState {
    AppState::in_memory(AppConfig::default())
}

pub fn state_with(config: AppConfig) -> AppState {
    AppState::in_memory(config)
}

/// Build the app over `state` and send one request. Every app built from the
/// same state shares its stores, so calls can be chained across helpers.
pub async fn send(state: &AppState, req: test::TestRequest) -> (StatusCode, Value) {
    let (status, _, body) = send_full(state, req).await;
    (status, body)
}

pub async fn send_full(
    state: &AppState,
    req: test::TestRequest,
) -> (StatusCode, actix_web::http::header::HeaderMap, Value) {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .configure(configure_app(state.clone()))
            .default_service(web::to(not_found)),
    )
    .await;

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

pub fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
}

pub async fn register(state: &AppState, name: &str, email: &str) -> (StatusCode, Value) {
    send(
        state,
        test::TestRequest::post().uri("/api/register").set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await
}

pub async fn login(state: &AppState, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        state,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register a fresh account and return its bearer token.
pub async fn user_token(state: &AppState, email: &str) -> String {
    let (status, _) = register(state, "Writer", email).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = login(state, email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Ids of the seeded platforms, in listing order (by name).
pub async fn platform_ids(state: &AppState, token: &str) -> Vec<String> {
    let (status, body) = send(
        state,
        authed(test::TestRequest::get().uri("/api/platforms"), token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["result"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn draft(title: &str, platforms: &[String]) -> Value {
    json!({
        "title": title,
        "content": "Body",
        "status": "draft",
        "platforms": platforms,
    })
}

pub async fn create_post(state: &AppState, token: &str, payload: Value) -> (StatusCode, Value) {
    send(
        state,
        authed(test::TestRequest::post().uri("/api/posts"), token).set_json(payload),
    )
    .await
}
