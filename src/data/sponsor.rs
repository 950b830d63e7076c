//! Repository for sponsor roles, platforms and platform roles.

use migration::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::model::sponsor::{SponsorPlatform, SponsorPlatformRole, SponsorRoles};

pub struct SponsorRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SponsorRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the monthly and one-time sponsor roles of a guild.
    ///
    /// # Returns
    /// - `Ok(Some(SponsorRoles))` - Sponsor roles configured
    /// - `Ok(None)` - Guild has no sponsor configuration
    /// - `Err(DbErr)` - Database error or a stored role ID failed to parse
    pub async fn get_roles(&self, guild_id: u64) -> Result<Option<SponsorRoles>, DbErr> {
        let Some(entity) = entity::prelude::SponsorRole::find_by_id(guild_id.to_string())
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(SponsorRoles {
            monthly_role_id: parse_optional_id("monthly_role_id", entity.monthly_role_id)?,
            one_time_role_id: parse_optional_id("one_time_role_id", entity.one_time_role_id)?,
        }))
    }

    pub async fn set_roles(&self, guild_id: u64, roles: &SponsorRoles) -> Result<(), DbErr> {
        entity::prelude::SponsorRole::insert(entity::sponsor_role::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            monthly_role_id: ActiveValue::Set(roles.monthly_role_id.map(|id| id.to_string())),
            one_time_role_id: ActiveValue::Set(roles.one_time_role_id.map(|id| id.to_string())),
        })
        .on_conflict(
            OnConflict::column(entity::sponsor_role::Column::GuildId)
                .update_columns([
                    entity::sponsor_role::Column::MonthlyRoleId,
                    entity::sponsor_role::Column::OneTimeRoleId,
                ])
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }

    /// Gets the platforms of a guild in the order they were added.
    pub async fn get_platforms(&self, guild_id: u64) -> Result<Vec<SponsorPlatform>, DbErr> {
        let entities = entity::prelude::SponsorPlatform::find()
            .filter(entity::sponsor_platform::Column::GuildId.eq(guild_id.to_string()))
            .order_by_asc(entity::sponsor_platform::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(|e| SponsorPlatform {
                name: e.name,
                emoji: e.emoji,
                url: e.url,
            })
            .collect())
    }

    /// Adds a platform or replaces the emoji and URL of an existing one with the same name.
    pub async fn upsert_platform(
        &self,
        guild_id: u64,
        platform: &SponsorPlatform,
    ) -> Result<(), DbErr> {
        let existing = entity::prelude::SponsorPlatform::find()
            .filter(entity::sponsor_platform::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::sponsor_platform::Column::Name.eq(platform.name.as_str()))
            .one(self.db)
            .await?;

        match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.emoji = ActiveValue::Set(platform.emoji.clone());
                active.url = ActiveValue::Set(platform.url.clone());
                active.update(self.db).await?;
            }
            None => {
                entity::sponsor_platform::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id.to_string()),
                    name: ActiveValue::Set(platform.name.clone()),
                    emoji: ActiveValue::Set(platform.emoji.clone()),
                    url: ActiveValue::Set(platform.url.clone()),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }

    pub async fn get_platform_roles(
        &self,
        guild_id: u64,
    ) -> Result<Vec<SponsorPlatformRole>, DbErr> {
        entity::prelude::SponsorPlatformRole::find()
            .filter(entity::sponsor_platform_role::Column::GuildId.eq(guild_id.to_string()))
            .all(self.db)
            .await?
            .into_iter()
            .map(|e| {
                Ok(SponsorPlatformRole {
                    role_id: e.role_id.parse::<u64>().map_err(|err| {
                        DbErr::Custom(format!("Failed to parse role_id: {}", err))
                    })?,
                    platform: e.platform,
                })
            })
            .collect()
    }

    pub async fn set_platform_role(
        &self,
        guild_id: u64,
        role_id: u64,
        platform: &str,
    ) -> Result<(), DbErr> {
        entity::prelude::SponsorPlatformRole::insert(entity::sponsor_platform_role::ActiveModel {
            role_id: ActiveValue::Set(role_id.to_string()),
            guild_id: ActiveValue::Set(guild_id.to_string()),
            platform: ActiveValue::Set(platform.to_string()),
        })
        .on_conflict(
            OnConflict::column(entity::sponsor_platform_role::Column::RoleId)
                .update_columns([
                    entity::sponsor_platform_role::Column::GuildId,
                    entity::sponsor_platform_role::Column::Platform,
                ])
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }
}

fn parse_optional_id(field: &str, value: Option<String>) -> Result<Option<u64>, DbErr> {
    value
        .map(|id| {
            id.parse::<u64>()
                .map_err(|e| DbErr::Custom(format!("Failed to parse {}: {}", field, e)))
        })
        .transpose()
}
