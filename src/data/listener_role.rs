use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::listener_role::ListenerRoleMapping;

pub struct ListenerRoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ListenerRoleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets every mapping configured for a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Vec<ListenerRoleMapping>)` - Mappings in the order they were first configured
    /// - `Err(DbErr)` - Database error or a stored ID failed to parse
    pub async fn get_by_guild(&self, guild_id: u64) -> Result<Vec<ListenerRoleMapping>, DbErr> {
        entity::prelude::ListenerRole::find()
            .filter(entity::listener_role::Column::GuildId.eq(guild_id.to_string()))
            .order_by_asc(entity::listener_role::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(ListenerRoleMapping::from_entity)
            .collect()
    }

    /// Finds the mapping of a single for-role.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `for_role_id` - The role that makes members eligible
    ///
    /// # Returns
    /// - `Ok(Some(ListenerRoleMapping))` - The for-role is mapped
    /// - `Ok(None)` - The for-role has no listener role
    /// - `Err(DbErr)` - Database error
    pub async fn find_by_for_role(
        &self,
        guild_id: u64,
        for_role_id: u64,
    ) -> Result<Option<ListenerRoleMapping>, DbErr> {
        entity::prelude::ListenerRole::find()
            .filter(entity::listener_role::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::listener_role::Column::ForRoleId.eq(for_role_id.to_string()))
            .one(self.db)
            .await?
            .map(ListenerRoleMapping::from_entity)
            .transpose()
    }

    /// Maps a for-role to a listener role, replacing any previous listener role.
    ///
    /// Replacing keeps the row's original position so the overview order is stable.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `for_role_id` - The role that makes members eligible
    /// - `listener_role_id` - The role granted while listening
    ///
    /// # Returns
    /// - `Ok(())` - Mapping stored
    /// - `Err(DbErr)` - Database error
    pub async fn upsert(
        &self,
        guild_id: u64,
        for_role_id: u64,
        listener_role_id: u64,
    ) -> Result<(), DbErr> {
        let existing = entity::prelude::ListenerRole::find()
            .filter(entity::listener_role::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::listener_role::Column::ForRoleId.eq(for_role_id.to_string()))
            .one(self.db)
            .await?;

        match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.listener_role_id = ActiveValue::Set(listener_role_id.to_string());
                active.update(self.db).await?;
            }
            None => {
                entity::listener_role::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id.to_string()),
                    for_role_id: ActiveValue::Set(for_role_id.to_string()),
                    listener_role_id: ActiveValue::Set(listener_role_id.to_string()),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Deletes the mapping of a single for-role.
    ///
    /// # Returns
    /// - `Ok(true)` - A mapping existed and was deleted
    /// - `Ok(false)` - The for-role was not mapped
    pub async fn delete_for_role(&self, guild_id: u64, for_role_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::ListenerRole::delete_many()
            .filter(entity::listener_role::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::listener_role::Column::ForRoleId.eq(for_role_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes every mapping granting `listener_role_id`.
    ///
    /// Used to prune mappings whose listener role no longer exists in the guild.
    pub async fn delete_by_listener_role(
        &self,
        guild_id: u64,
        listener_role_id: u64,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::ListenerRole::delete_many()
            .filter(entity::listener_role::Column::GuildId.eq(guild_id.to_string()))
            .filter(
                entity::listener_role::Column::ListenerRoleId.eq(listener_role_id.to_string()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes every mapping of a guild.
    pub async fn delete_guild(&self, guild_id: u64) -> Result<u64, DbErr> {
        let result = entity::prelude::ListenerRole::delete_many()
            .filter(entity::listener_role::Column::GuildId.eq(guild_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Gets the IDs of all guilds with at least one mapping.
    pub async fn guild_ids(&self) -> Result<Vec<u64>, DbErr> {
        let guild_ids: Vec<String> = entity::prelude::ListenerRole::find()
            .select_only()
            .column(entity::listener_role::Column::GuildId)
            .distinct()
            .into_tuple()
            .all(self.db)
            .await?;

        guild_ids
            .into_iter()
            .map(|id| {
                id.parse::<u64>()
                    .map_err(|e| DbErr::Custom(format!("Failed to parse guild_id: {}", e)))
            })
            .collect()
    }
}
