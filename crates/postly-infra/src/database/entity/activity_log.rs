//! `activity_logs`: one row per audited action, never updated.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use postly_core::domain::ActivityLog;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub meta: Json,
    pub created_at: DateTimeWithTimeZone,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ActivityLog {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            meta: model.meta,
            created_at: model.created_at.into(),
        }
    }
}

impl From<ActivityLog> for ActiveModel {
    fn from(entry: ActivityLog) -> Self {
        Self {
            id: Set(entry.id),
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            meta: Set(entry.meta),
            created_at: Set(entry.created_at.into()),
        }
    }
}
