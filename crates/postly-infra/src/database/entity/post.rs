//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use postly_core::domain::PostStatus as DomainPostStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PostStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "published")]
    Published,
}

impl From<DomainPostStatus> for PostStatus {
    fn from(value: DomainPostStatus) -> Self {
        match value {
            DomainPostStatus::Draft => Self::Draft,
            DomainPostStatus::Scheduled => Self::Scheduled,
            DomainPostStatus::Published => Self::Published,
        }
    }
}

impl From<PostStatus> for DomainPostStatus {
    fn from(value: PostStatus) -> Self {
        match value {
            PostStatus::Draft => Self::Draft,
            PostStatus::Scheduled => Self::Scheduled,
            PostStatus::Published => Self::Published,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image_url: Option<String>,
    pub scheduled_time: Option<DateTimeWithTimeZone>,
    pub status: PostStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_platform::Entity")]
    PostPlatform,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostPlatform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for postly_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            content: model.content,
            image_url: model.image_url,
            scheduled_time: model.scheduled_time.map(Into::into),
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<postly_core::domain::Post> for ActiveModel {
    fn from(post: postly_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            user_id: Set(post.user_id),
            title: Set(post.title),
            content: Set(post.content),
            image_url: Set(post.image_url),
            scheduled_time: Set(post.scheduled_time.map(Into::into)),
            status: Set(post.status.into()),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
