use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MacroEntry::Table)
                    .if_not_exists()
                    .col(string(MacroEntry::Name).primary_key())
                    .col(string(MacroEntry::Title))
                    .col(text(MacroEntry::Description))
                    .col(string(MacroEntry::Creator))
                    .col(timestamp(MacroEntry::DateCreated))
                    .col(timestamp(MacroEntry::DateEdited))
                    .col(string_null(MacroEntry::ImageUrl))
                    .col(string_null(MacroEntry::EmbedColor))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MacroEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MacroEntry {
    Table,
    Name,
    Title,
    Description,
    Creator,
    DateCreated,
    DateEdited,
    ImageUrl,
    EmbedColor,
}
