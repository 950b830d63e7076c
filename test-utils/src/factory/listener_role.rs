//! Factory for guild listener role mappings.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts a for-role to listener-role mapping for a guild.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Discord guild ID
/// - `for_role_id` - Role that makes members eligible
/// - `listener_role_id` - Role granted while listening
///
/// # Returns
/// - `Ok(entity::listener_role::Model)` - Created mapping
/// - `Err(DbErr)` - Database error during insert
pub async fn create_listener_role(
    db: &DatabaseConnection,
    guild_id: u64,
    for_role_id: u64,
    listener_role_id: u64,
) -> Result<entity::listener_role::Model, DbErr> {
    entity::listener_role::ActiveModel {
        guild_id: ActiveValue::Set(guild_id.to_string()),
        for_role_id: ActiveValue::Set(for_role_id.to_string()),
        listener_role_id: ActiveValue::Set(listener_role_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}
