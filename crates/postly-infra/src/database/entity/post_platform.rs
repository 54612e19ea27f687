//! Post/platform association. Each edge carries its own delivery status.

use sea_orm::entity::prelude::*;

use postly_core::domain::PlatformStatus as DomainPlatformStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PlatformStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "published")]
    Published,
}

impl From<DomainPlatformStatus> for PlatformStatus {
    fn from(value: DomainPlatformStatus) -> Self {
        match value {
            DomainPlatformStatus::Pending => Self::Pending,
            DomainPlatformStatus::Published => Self::Published,
        }
    }
}

impl From<PlatformStatus> for DomainPlatformStatus {
    fn from(value: PlatformStatus) -> Self {
        match value {
            PlatformStatus::Pending => Self::Pending,
            PlatformStatus::Published => Self::Published,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_platforms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub platform_id: Uuid,
    pub platform_status: PlatformStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::platform::Entity",
        from = "Column::PlatformId",
        to = "super::platform::Column::Id",
        on_delete = "Cascade"
    )]
    Platform,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Platform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
