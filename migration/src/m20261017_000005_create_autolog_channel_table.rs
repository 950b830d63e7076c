use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AutologChannel::Table)
                    .if_not_exists()
                    .col(pk_auto(AutologChannel::Id))
                    .col(string(AutologChannel::GuildId))
                    .col(string(AutologChannel::ChannelId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_autolog_channel_guild_channel")
                    .table(AutologChannel::Table)
                    .col(AutologChannel::GuildId)
                    .col(AutologChannel::ChannelId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_autolog_channel_guild_channel")
                    .table(AutologChannel::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AutologChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AutologChannel {
    Table,
    Id,
    GuildId,
    ChannelId,
}
