mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::json;

use api_server::config::AppConfig;
use postly_core::services::{PostSettings, SweepOutcome};

use common::*;

#[actix_web::test]
async fn create_returns_201_with_pending_platforms() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    let (status, body) = create_post(
        &state,
        &token,
        json!({
            "title": "Launch",
            "content": "We are live",
            "image_url": "https://cdn.example.com/launch.png",
            "status": "scheduled",
            "scheduled_time": (Utc::now() + Duration::hours(1)).to_rfc3339(),
            "platforms": [ids[0], ids[1], ids[0]],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["status"], "scheduled");
    let platforms = body["result"]["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 2);
    assert!(platforms.iter().all(|p| p["platform_status"] == "pending"));
}

#[actix_web::test]
async fn create_with_empty_platforms_fails_validation() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;

    let (status, body) = create_post(&state, &token, draft("Launch", &[])).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["platforms"].is_array());

    let (_, listing) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts"), &token),
    )
    .await;
    assert_eq!(listing["result"]["total"], 0);
}

#[actix_web::test]
async fn create_with_unknown_platform_is_reported_by_index() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;
    let unknown = uuid::Uuid::new_v4().to_string();

    let (status, body) = create_post(
        &state,
        &token,
        draft("Launch", &[ids[0].clone(), unknown.clone()]),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["platforms.1"].is_array());

    let repeated = [ids[0].clone(), ids[0].clone(), unknown];
    let (status, body) = create_post(&state, &token, draft("Launch", &repeated)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["platforms.2"].is_array());
    assert!(body["error"]["platforms.1"].is_null());
}

#[actix_web::test]
async fn eleventh_post_of_the_day_is_rate_limited() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    for i in 0..10 {
        let (status, _) = create_post(&state, &token, draft(&format!("Post {}", i), &ids)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = create_post(&state, &token, draft("One too many", &ids)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["status"], 429);
    assert_eq!(body["success"], false);

    let (_, listing) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts"), &token),
    )
    .await;
    assert_eq!(listing["result"]["total"], 10);
}

#[actix_web::test]
async fn other_users_posts_are_forbidden() {
    let state = state();
    let owner = user_token(&state, "owner@example.com").await;
    let intruder = user_token(&state, "intruder@example.com").await;
    let ids = platform_ids(&state, &owner).await;

    let (_, created) = create_post(&state, &owner, draft("Mine", &ids[..1])).await;
    let uri = format!("/api/posts/{}", created["result"]["id"].as_str().unwrap());

    let (status, body) = send(&state, authed(test::TestRequest::get().uri(&uri), &intruder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Unauthorized");

    let (status, _) = send(
        &state,
        authed(test::TestRequest::put().uri(&uri), &intruder).set_json(json!({"title": "Stolen"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        send(&state, authed(test::TestRequest::delete().uri(&uri), &intruder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&state, authed(test::TestRequest::get().uri(&uri), &owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["title"], "Mine");
}

#[actix_web::test]
async fn update_resyncs_platforms_and_delete_removes() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    let (_, created) = create_post(&state, &token, draft("Launch", &ids[..2])).await;
    let uri = format!("/api/posts/{}", created["result"]["id"].as_str().unwrap());

    let (status, body) = send(
        &state,
        authed(test::TestRequest::put().uri(&uri), &token)
            .set_json(json!({ "title": "Renamed", "platforms": [ids[3]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["title"], "Renamed");
    let platforms = body["result"]["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 1);
    assert_eq!(platforms[0]["id"], ids[3].as_str());
    assert_eq!(platforms[0]["platform_status"], "pending");

    let (status, body) = send(&state, authed(test::TestRequest::delete().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "Post deleted successfully");

    let (status, _) = send(&state, authed(test::TestRequest::get().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_post_id_is_not_found() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts/42"), &token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn listing_is_paginated_and_filterable() {
    let state = state_with(AppConfig {
        posts: PostSettings {
            daily_limit: 20,
            ..PostSettings::default()
        },
        ..AppConfig::default()
    });
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    for i in 0..11 {
        create_post(&state, &token, draft(&format!("Draft {}", i), &ids[..1])).await;
    }
    let tomorrow = Utc::now() + Duration::days(1);
    create_post(
        &state,
        &token,
        json!({
            "title": "Scheduled",
            "content": "Later",
            "status": "scheduled",
            "scheduled_time": tomorrow.format("%Y-%m-%d %H:%M:%S").to_string(),
            "platforms": [ids[0]],
        }),
    )
    .await;

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts?page=2"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["result"];
    assert_eq!(page["current_page"], 2);
    assert_eq!(page["per_page"], 10);
    assert_eq!(page["total"], 12);
    assert_eq!(page["last_page"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);

    let uri = format!(
        "/api/posts?status=scheduled&date={}",
        tomorrow.format("%Y-%m-%d")
    );
    let (_, body) = send(&state, authed(test::TestRequest::get().uri(&uri), &token)).await;
    assert_eq!(body["result"]["total"], 1);
    assert_eq!(body["result"]["data"][0]["title"], "Scheduled");

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts?status=archived"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["status"].is_array());
}

#[actix_web::test]
async fn page_number_past_the_cap_is_a_validation_error() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;

    for page in ["18446744073709551615", "4294967296"] {
        let uri = format!("/api/posts?page={page}");
        let (status, body) = send(&state, authed(test::TestRequest::get().uri(&uri), &token)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["page"].is_array());
    }

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/posts?page=4294967295"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["total"], 0);

    let (status, body) = send(
        &state,
        authed(
            test::TestRequest::get().uri("/api/platforms?page=18446744073709551615"),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["page"].is_array());
}

#[actix_web::test]
async fn sweep_publishes_post_and_edges() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    let (_, created) = create_post(
        &state,
        &token,
        json!({
            "title": "Soon",
            "content": "Body",
            "status": "scheduled",
            "scheduled_time": (Utc::now() + Duration::minutes(5)).to_rfc3339(),
            "platforms": [ids[0], ids[1]],
        }),
    )
    .await;
    let uri = format!("/api/posts/{}", created["result"]["id"].as_str().unwrap());

    let outcome = state
        .publisher
        .sweep(Utc::now() + Duration::minutes(10))
        .await
        .unwrap();
    assert!(matches!(outcome, SweepOutcome::Completed(ref r) if r.published.len() == 1));

    let (_, body) = send(&state, authed(test::TestRequest::get().uri(&uri), &token)).await;
    assert_eq!(body["result"]["status"], "published");
    let platforms = body["result"]["platforms"].as_array().unwrap();
    assert!(platforms.iter().all(|p| p["platform_status"] == "published"));
}

#[actix_web::test]
async fn user_stats_count_by_status_and_platform() {
    let state = state();
    let token = user_token(&state, "ada@example.com").await;
    let ids = platform_ids(&state, &token).await;

    create_post(&state, &token, draft("One", &ids[..2])).await;
    create_post(
        &state,
        &token,
        json!({
            "title": "Two",
            "content": "Body",
            "status": "scheduled",
            "scheduled_time": (Utc::now() + Duration::hours(2)).to_rfc3339(),
            "platforms": [ids[0]],
        }),
    )
    .await;

    let (status, body) = send(
        &state,
        authed(test::TestRequest::get().uri("/api/analytics/user-stats"), &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["result"];
    assert_eq!(stats["total_posts"], 2);
    assert_eq!(stats["scheduled_posts"], 1);
    assert_eq!(stats["published_posts"], 0);
    let per_platform = stats["posts_per_platform"].as_object().unwrap();
    assert_eq!(per_platform.values().map(|v| v.as_u64().unwrap()).sum::<u64>(), 3);
}
