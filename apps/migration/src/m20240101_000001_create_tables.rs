use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamptz(Users::CreatedAt))
                    .col(timestamptz(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Platforms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Platforms::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Platforms::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Platforms::Type).string_len(16).not_null())
                    .col(timestamptz(Platforms::CreatedAt))
                    .col(timestamptz(Platforms::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(Posts::ScheduledTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Posts::Status).string_len(16).not_null())
                    .col(timestamptz(Posts::CreatedAt))
                    .col(timestamptz(Posts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Due-post selection.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_status_scheduled_time")
                    .table(Posts::Table)
                    .col(Posts::Status)
                    .col(Posts::ScheduledTime)
                    .to_owned(),
            )
            .await?;

        // Listing and the daily quota count.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_user_created_at")
                    .table(Posts::Table)
                    .col(Posts::UserId)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostPlatforms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostPlatforms::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostPlatforms::PlatformId).uuid().not_null())
                    .col(
                        ColumnDef::new(PostPlatforms::PlatformStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(timestamptz(PostPlatforms::CreatedAt))
                    .col(timestamptz(PostPlatforms::UpdatedAt))
                    .primary_key(
                        Index::create()
                            .col(PostPlatforms::PostId)
                            .col(PostPlatforms::PlatformId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_platforms_post")
                            .from(PostPlatforms::Table, PostPlatforms::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_platforms_platform")
                            .from(PostPlatforms::Table, PostPlatforms::PlatformId)
                            .to(Platforms::Table, Platforms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPlatforms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserPlatforms::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserPlatforms::PlatformId).uuid().not_null())
                    .col(timestamptz(UserPlatforms::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(UserPlatforms::UserId)
                            .col(UserPlatforms::PlatformId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_platforms_user")
                            .from(UserPlatforms::Table, UserPlatforms::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_platforms_platform")
                            .from(UserPlatforms::Table, UserPlatforms::PlatformId)
                            .to(Platforms::Table, Platforms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActivityLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ActivityLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(ActivityLogs::Action).string_len(64).not_null())
                    .col(ColumnDef::new(ActivityLogs::Meta).json_binary().not_null())
                    .col(timestamptz(ActivityLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_logs_user")
                            .from(ActivityLogs::Table, ActivityLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_user_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::UserId)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            ActivityLogs::Table.into_iden(),
            UserPlatforms::Table.into_iden(),
            PostPlatforms::Table.into_iden(),
            Posts::Table.into_iden(),
            Platforms::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn timestamptz<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Platforms {
    Table,
    Id,
    Name,
    Type,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    UserId,
    Title,
    Content,
    ImageUrl,
    ScheduledTime,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PostPlatforms {
    Table,
    PostId,
    PlatformId,
    PlatformStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserPlatforms {
    Table,
    UserId,
    PlatformId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    Meta,
    CreatedAt,
}
