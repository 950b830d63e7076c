//! Listener role mapping domain models.

use sea_orm::DbErr;

/// One for-role to listener-role entry of a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerRoleMapping {
    pub guild_id: u64,
    /// Role that makes a member eligible.
    pub for_role_id: u64,
    /// Role granted while the member is listening.
    pub listener_role_id: u64,
}

impl ListenerRoleMapping {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(ListenerRoleMapping)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - Failed to parse one of the stored IDs as u64
    pub fn from_entity(entity: entity::listener_role::Model) -> Result<Self, DbErr> {
        Ok(Self {
            guild_id: parse_id("guild_id", &entity.guild_id)?,
            for_role_id: parse_id("for_role_id", &entity.for_role_id)?,
            listener_role_id: parse_id("listener_role_id", &entity.listener_role_id)?,
        })
    }
}

fn parse_id(field: &str, value: &str) -> Result<u64, DbErr> {
    value
        .parse::<u64>()
        .map_err(|e| DbErr::Custom(format!("Failed to parse {}: {}", field, e)))
}

/// Live role data resolved from the gateway.
///
/// Only the properties needed to validate a listener role are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRole {
    pub role_id: u64,
    /// Position in the guild's role hierarchy (higher = more important).
    pub position: u16,
    /// Raw permission bit set.
    pub permissions: u64,
    /// Whether an integration (bot, booster, ...) manages the role.
    pub managed: bool,
}

/// One line of the role overview: a listener role and every for-role granting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerRoleGroup {
    pub listener_role_id: u64,
    /// For-roles in insertion order.
    pub for_role_ids: Vec<u64>,
}
