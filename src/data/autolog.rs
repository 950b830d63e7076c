use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};

pub struct AutologChannelRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AutologChannelRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn exists(&self, guild_id: u64, channel_id: u64) -> Result<bool, DbErr> {
        let count = entity::prelude::AutologChannel::find()
            .filter(entity::autolog_channel::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::autolog_channel::Column::ChannelId.eq(channel_id.to_string()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Starts observing a channel.
    ///
    /// # Returns
    /// - `Ok(true)` - Channel added
    /// - `Ok(false)` - Channel was already observed
    pub async fn add(&self, guild_id: u64, channel_id: u64) -> Result<bool, DbErr> {
        if self.exists(guild_id, channel_id).await? {
            return Ok(false);
        }

        entity::prelude::AutologChannel::insert(entity::autolog_channel::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            channel_id: ActiveValue::Set(channel_id.to_string()),
            ..Default::default()
        })
        .exec_without_returning(self.db)
        .await?;

        Ok(true)
    }

    /// Stops observing a channel.
    ///
    /// # Returns
    /// - `Ok(true)` - Channel removed
    /// - `Ok(false)` - Channel was not observed
    pub async fn remove(&self, guild_id: u64, channel_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::AutologChannel::delete_many()
            .filter(entity::autolog_channel::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::autolog_channel::Column::ChannelId.eq(channel_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn clear_guild(&self, guild_id: u64) -> Result<u64, DbErr> {
        let result = entity::prelude::AutologChannel::delete_many()
            .filter(entity::autolog_channel::Column::GuildId.eq(guild_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
