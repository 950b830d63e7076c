use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SponsorRole::Table)
                    .if_not_exists()
                    .col(string(SponsorRole::GuildId).primary_key())
                    .col(string_null(SponsorRole::MonthlyRoleId))
                    .col(string_null(SponsorRole::OneTimeRoleId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SponsorPlatform::Table)
                    .if_not_exists()
                    .col(pk_auto(SponsorPlatform::Id))
                    .col(string(SponsorPlatform::GuildId))
                    .col(string(SponsorPlatform::Name))
                    .col(string(SponsorPlatform::Emoji))
                    .col(string_null(SponsorPlatform::Url))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sponsor_platform_guild_name")
                    .table(SponsorPlatform::Table)
                    .col(SponsorPlatform::GuildId)
                    .col(SponsorPlatform::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SponsorPlatformRole::Table)
                    .if_not_exists()
                    .col(string(SponsorPlatformRole::RoleId).primary_key())
                    .col(string(SponsorPlatformRole::GuildId))
                    .col(string(SponsorPlatformRole::Platform))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SponsorPlatformRole::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sponsor_platform_guild_name")
                    .table(SponsorPlatform::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SponsorPlatform::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SponsorRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SponsorRole {
    Table,
    GuildId,
    MonthlyRoleId,
    OneTimeRoleId,
}

#[derive(DeriveIden)]
pub enum SponsorPlatform {
    Table,
    Id,
    GuildId,
    Name,
    Emoji,
    Url,
}

#[derive(DeriveIden)]
pub enum SponsorPlatformRole {
    Table,
    RoleId,
    GuildId,
    Platform,
}
