mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use api_server::config::AppConfig;

use common::*;

fn admin_state() -> api_server::state::AppState {
    state_with(AppConfig {
        admin_emails: vec!["root@example.com".to_string()],
        ..AppConfig::default()
    })
}

#[actix_web::test]
async fn lists_seeded_platforms_by_name() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/platforms"), &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["result"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Facebook", "Instagram", "LinkedIn", "Twitter"]);
    assert_eq!(body["result"]["total"], 4);
}

#[actix_web::test]
async fn toggle_replaces_the_active_set() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    let toggle = |platforms: Vec<String>| {
        authed(test::TestRequest::post().uri("/api/platforms/toggle"), &token)
            .set_json(json!({ "platforms": platforms }))
    };

    let (status, body) = send(&state, toggle(vec![ids[0].clone(), ids[1].clone()])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "User platforms updated successfully");

    send(&state, toggle(vec![ids[2].clone()])).await;

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/platforms/active"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let active = body["result"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], ids[2].as_str());

    let (status, body) = send(&state, toggle(vec!["not-a-uuid".to_string()])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["platforms.0"].is_array());
}

#[actix_web::test]
async fn show_missing_platform_is_not_found() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;

    let uri = format!("/api/platforms/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&state, authed(test::TestRequest::get().uri(&uri), &token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Platform not found.");
}

#[actix_web::test]
async fn only_admins_update_platforms() {
    let state = admin_state();
    let writer = user_token(&state, "writer@example.com").await;
    let admin = user_token(&state, "root@example.com").await;
    let ids = platform_ids(&state, &writer).await;
    let uri = format!("/api/platforms/{}", ids[0]);
    let payload = json!({ "name": "Threads", "type": "twitter" });

    let (status, body) = send(
        &state,
        authed(test::TestRequest::put().uri(&uri), &writer).set_json(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Unauthorized");

    let (status, body) = send(
        &state,
        authed(test::TestRequest::put().uri(&uri), &admin)
            .set_json(json!({ "name": "Threads", "type": "myspace" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["type"].is_array());

    let (status, body) = send(
        &state,
        authed(test::TestRequest::put().uri(&uri), &admin).set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["name"], "Threads");
    assert_eq!(body["result"]["type"], "twitter");
}

#[actix_web::test]
async fn deleting_a_platform_detaches_it_from_posts() {
    let state = admin_state();
    let writer = user_token(&state, "writer@example.com").await;
    let admin = user_token(&state, "root@example.com").await;
    let ids = platform_ids(&state, &writer).await;

    let (_, created) = create_post(&state, &writer, draft("Launch", &ids[..2])).await;
    let post_uri = format!("/api/posts/{}", created["result"]["id"].as_str().unwrap());

    let platform_uri = format!("/api/platforms/{}", ids[0]);
    let (status, _) =
        send(&state, authed(test::TestRequest::delete().uri(&platform_uri), &writer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        send(&state, authed(test::TestRequest::delete().uri(&platform_uri), &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "Platform deleted successfully");

    let (_, body) = send(&state, authed(test::TestRequest::get().uri(&post_uri), &writer)).await;
    let platforms = body["result"]["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 1);
    assert_eq!(platforms[0]["id"], ids[1].as_str());
}
