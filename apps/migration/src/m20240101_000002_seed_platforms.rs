use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_tables::Platforms;

const SEED: [(&str, &str); 4] = [
    ("Facebook", "facebook"),
    ("Twitter", "twitter"),
    ("LinkedIn", "linkedin"),
    ("Instagram", "instagram"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Platforms::Table)
            .columns([Platforms::Id, Platforms::Name, Platforms::Type])
            .on_conflict(OnConflict::column(Platforms::Name).do_nothing().to_owned());

        for (name, kind) in SEED {
            insert
                .values([Expr::cust("gen_random_uuid()"), name.into(), kind.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Platforms::Table)
            .and_where(Expr::col(Platforms::Name).is_in(SEED.map(|(name, _)| name)))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
