use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListenerRole::Table)
                    .if_not_exists()
                    .col(pk_auto(ListenerRole::Id))
                    .col(string(ListenerRole::GuildId))
                    .col(string(ListenerRole::ForRoleId))
                    .col(string(ListenerRole::ListenerRoleId))
                    .to_owned(),
            )
            .await?;

        // A for-role maps to exactly one listener role per guild
        manager
            .create_index(
                Index::create()
                    .name("idx_listener_role_guild_for_role")
                    .table(ListenerRole::Table)
                    .col(ListenerRole::GuildId)
                    .col(ListenerRole::ForRoleId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_listener_role_guild_for_role")
                    .table(ListenerRole::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ListenerRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ListenerRole {
    Table,
    Id,
    GuildId,
    ForRoleId,
    ListenerRoleId,
}
