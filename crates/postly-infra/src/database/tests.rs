use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use postly_core::domain::{PageRequest, PlatformStatus, PostFilter, PostStatus, User};
use postly_core::error::RepoError;
use postly_core::ports::{
    BaseRepository, CreateResult, CreationQuota, PostRepository, PublishResult, UserRepository,
};

use super::entity::{platform, post, post_platform, user};
use super::postgres_posts::PostgresPostRepository;
use super::postgres_repo::PostgresUserRepository;

fn at(h: u32, m: u32, s: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

fn post_model(id: Uuid, status: post::PostStatus) -> post::Model {
    post::Model {
        id,
        user_id: Uuid::new_v4(),
        title: "Launch".to_owned(),
        content: "We are live".to_owned(),
        image_url: None,
        scheduled_time: Some(at(10, 0, 0).into()),
        status,
        created_at: at(8, 0, 0).into(),
        updated_at: at(8, 0, 0).into(),
    }
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_find_post_with_platforms() {
    let post_id = Uuid::new_v4();
    let platform_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, post::PostStatus::Scheduled)]])
        .append_query_results([vec![(
            post_platform::Model {
                post_id,
                platform_id,
                platform_status: post_platform::PlatformStatus::Pending,
                created_at: at(8, 0, 0).into(),
                updated_at: at(8, 0, 0).into(),
            },
            platform::Model {
                id: platform_id,
                name: "Twitter".to_owned(),
                platform_type: platform::PlatformType::Twitter,
                created_at: at(7, 0, 0).into(),
                updated_at: at(7, 0, 0).into(),
            },
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let found = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(found.post.title, "Launch");
    assert_eq!(found.post.status, PostStatus::Scheduled);
    assert_eq!(found.platform_ids(), vec![platform_id]);
    assert_eq!(found.platforms[0].platform_status, PlatformStatus::Pending);
}

#[tokio::test]
async fn test_find_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_publish_flips_post_and_edges() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(1), exec(3)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.publish(Uuid::new_v4(), at(10, 0, 1)).await.unwrap();

    assert_eq!(result, PublishResult::Published { associations: 3 });
}

#[tokio::test]
async fn test_publish_skips_post_no_longer_scheduled() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.publish(Uuid::new_v4(), at(10, 0, 1)).await.unwrap();

    assert_eq!(result, PublishResult::Skipped);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(0), exec(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(matches!(
        repo.delete(Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_create_over_quota_writes_nothing() {
    let owner = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id: owner,
            name: "Writer".to_owned(),
            email: "writer@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            is_admin: false,
            created_at: at(7, 0, 0).into(),
            updated_at: at(7, 0, 0).into(),
        }]])
        .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(10)))])]])
        .into_connection();

    let mut model = post_model(Uuid::new_v4(), post::PostStatus::Draft);
    model.user_id = owner;
    let quota = CreationQuota {
        limit: 10,
        from: at(0, 0, 0),
        to: at(23, 59, 59),
    };

    let repo = PostgresPostRepository::new(db);
    let result = repo
        .create(model.into(), &[Uuid::new_v4()], quota)
        .await
        .unwrap();

    assert!(matches!(result, CreateResult::QuotaReached { created: 10 }));
}

#[tokio::test]
async fn test_list_for_user_pages() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(11)))])]])
        .append_query_results([vec![post_model(Uuid::new_v4(), post::PostStatus::Draft)]])
        .append_query_results([Vec::<post_platform::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo
        .list_for_user(user_id, &PostFilter::default(), PageRequest::new(2, 10))
        .await
        .unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.page, 2);
    assert_eq!(page.last_page(), 2);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_find_user_by_email() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id: user_id,
            name: "Writer".to_owned(),
            email: "writer@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            is_admin: false,
            created_at: at(7, 0, 0).into(),
            updated_at: at(7, 0, 0).into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo
        .find_by_email("writer@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.id, user_id);
    assert!(!user.is_admin);
}

#[tokio::test]
async fn test_find_user_by_id_through_base_repository() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: Option<User> = repo.find_by_id(Uuid::new_v4()).await.unwrap();

    assert!(user.is_none());
}
