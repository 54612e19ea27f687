//! Platform entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use postly_core::domain::PlatformType as DomainPlatformType;

/// Stored platform type; mirrors the closed domain enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PlatformType {
    #[sea_orm(string_value = "twitter")]
    Twitter,
    #[sea_orm(string_value = "instagram")]
    Instagram,
    #[sea_orm(string_value = "linkedin")]
    Linkedin,
    #[sea_orm(string_value = "facebook")]
    Facebook,
    #[sea_orm(string_value = "tiktok")]
    Tiktok,
}

impl From<DomainPlatformType> for PlatformType {
    fn from(value: DomainPlatformType) -> Self {
        match value {
            DomainPlatformType::Twitter => Self::Twitter,
            DomainPlatformType::Instagram => Self::Instagram,
            DomainPlatformType::Linkedin => Self::Linkedin,
            DomainPlatformType::Facebook => Self::Facebook,
            DomainPlatformType::Tiktok => Self::Tiktok,
        }
    }
}

impl From<PlatformType> for DomainPlatformType {
    fn from(value: PlatformType) -> Self {
        match value {
            PlatformType::Twitter => Self::Twitter,
            PlatformType::Instagram => Self::Instagram,
            PlatformType::Linkedin => Self::Linkedin,
            PlatformType::Facebook => Self::Facebook,
            PlatformType::Tiktok => Self::Tiktok,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "platforms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub platform_type: PlatformType,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_platform::Entity")]
    PostPlatform,
    #[sea_orm(has_many = "super::user_platform::Entity")]
    UserPlatform,
}

impl Related<super::post_platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostPlatform.def()
    }
}

impl Related<super::user_platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPlatform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for postly_core::domain::Platform {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            platform_type: model.platform_type.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<postly_core::domain::Platform> for ActiveModel {
    fn from(platform: postly_core::domain::Platform) -> Self {
        Self {
            id: Set(platform.id),
            name: Set(platform.name),
            platform_type: Set(platform.platform_type.into()),
            created_at: Set(platform.created_at.into()),
            updated_at: Set(platform.updated_at.into()),
        }
    }
}
