//! Guild role mapping store: configuration of for-role to listener-role mappings.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    data::listener_role::ListenerRoleRepository,
    error::{role::RoleConfigError, AppError},
    model::listener_role::{GuildRole, ListenerRoleGroup, ListenerRoleMapping},
    service::{
        catalog::KnownAppRegistry,
        lock::GuildLocks,
        reconcile::{GuildOutcome, RoleGateway, RoleReconciler},
    },
};

/// Checks the for-role/listener-role separation of a new mapping.
///
/// A role may not be a listener role and a for-role in the same guild. Remapping an
/// existing for-role is allowed.
///
/// # Arguments
/// - `mappings` - Current mappings of the guild
/// - `for_role_id` - Role that makes members eligible
/// - `listener_role_id` - Role to grant while listening
///
/// # Returns
/// - `Ok(())` - The mapping may be stored
/// - `Err(RoleConfigError::ListenerIsForRole)` - The listener role is a for-role
/// - `Err(RoleConfigError::ForIsListenerRole)` - The for-role is a listener role
pub fn validate_mapping(
    mappings: &[ListenerRoleMapping],
    for_role_id: u64,
    listener_role_id: u64,
) -> Result<(), RoleConfigError> {
    if listener_role_id == for_role_id
        || mappings.iter().any(|m| m.for_role_id == listener_role_id)
    {
        return Err(RoleConfigError::ListenerIsForRole(listener_role_id));
    }

    if mappings.iter().any(|m| m.listener_role_id == for_role_id) {
        return Err(RoleConfigError::ForIsListenerRole(for_role_id));
    }

    Ok(())
}

/// Checks that the bot can grant the role and that it carries no permissions.
///
/// # Arguments
/// - `role` - Resolved listener role
/// - `bot_top_position` - Position of the bot's highest role
pub fn validate_listener_role(
    role: &GuildRole,
    bot_top_position: u16,
) -> Result<(), RoleConfigError> {
    if role.managed || role.position >= bot_top_position {
        return Err(RoleConfigError::NotAssignable);
    }

    if role.permissions != 0 {
        return Err(RoleConfigError::HasPermissions);
    }

    Ok(())
}

/// Groups mappings by listener role, keeping first-seen order for both levels.
pub fn group_by_listener(mappings: &[ListenerRoleMapping]) -> Vec<ListenerRoleGroup> {
    let mut groups: Vec<ListenerRoleGroup> = Vec::new();

    for mapping in mappings {
        match groups
            .iter_mut()
            .find(|g| g.listener_role_id == mapping.listener_role_id)
        {
            Some(group) => group.for_role_ids.push(mapping.for_role_id),
            None => groups.push(ListenerRoleGroup {
                listener_role_id: mapping.listener_role_id,
                for_role_ids: vec![mapping.for_role_id],
            }),
        }
    }

    groups
}

/// Joins items with `", "`, using `" and "` before the last one.
pub fn join_with_and(items: &[String]) -> String {
    let joined = items.join(", ");
    match joined.rfind(", ") {
        Some(index) => format!("{} and {}", &joined[..index], &joined[index + 2..]),
        None => joined,
    }
}

/// Renders the role overview, one line per listener role.
pub fn format_overview(groups: &[ListenerRoleGroup]) -> String {
    groups
        .iter()
        .map(|group| {
            let for_roles: Vec<String> = group
                .for_role_ids
                .iter()
                .map(|id| format!("<@&{}>", id))
                .collect();
            format!(
                "- <@&{}> is assigned to {}",
                group.listener_role_id,
                join_with_and(&for_roles)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ListenerRoleService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn RoleGateway,
    registry: &'a KnownAppRegistry,
    locks: &'a GuildLocks,
}

impl<'a> ListenerRoleService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        gateway: &'a dyn RoleGateway,
        registry: &'a KnownAppRegistry,
        locks: &'a GuildLocks,
    ) -> Self {
        Self {
            db,
            gateway,
            registry,
            locks,
        }
    }

    fn reconciler(&self) -> RoleReconciler<'a> {
        RoleReconciler::new(self.db, self.gateway, self.registry, self.locks)
    }

    /// Maps a for-role to a listener role and re-evaluates the guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `for_role_id` - Role that makes members eligible
    /// - `listener_role_id` - Role to grant while listening
    ///
    /// # Returns
    /// - `Ok(())` - Mapping stored and guild reconciled
    /// - `Err(AppError::RoleConfigErr)` - Mapping rejected, nothing changed
    /// - `Err(AppError::NotFound)` - Listener role does not exist
    /// - `Err(AppError)` - Database or gateway error
    pub async fn set_mapping(
        &self,
        guild_id: u64,
        for_role_id: u64,
        listener_role_id: u64,
    ) -> Result<(), AppError> {
        let _guard = self.locks.lock(guild_id).await;
        let repo = ListenerRoleRepository::new(self.db);

        let mappings = repo.get_by_guild(guild_id).await?;
        validate_mapping(&mappings, for_role_id, listener_role_id)?;

        let role = self
            .gateway
            .resolve_role(guild_id, listener_role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role <@&{}> not found", listener_role_id)))?;
        let bot_top_position = self.gateway.bot_top_position(guild_id).await?;
        validate_listener_role(&role, bot_top_position)?;

        repo.upsert(guild_id, for_role_id, listener_role_id).await?;

        tracing::info!(
            "Listener role for {} in guild {} is now {}",
            for_role_id,
            guild_id,
            listener_role_id
        );

        self.reconciler()
            .reconcile_guild_locked(guild_id, Utc::now())
            .await?;

        Ok(())
    }

    /// Removes a for-role's mapping and its listener role from every member.
    ///
    /// Members still eligible through another for-role with the same listener role get
    /// it back right away.
    ///
    /// # Returns
    /// - `Ok(Some(listener_role_id))` - Mapping removed
    /// - `Ok(None)` - The for-role was not configured, or its listener role no longer
    ///   exists (the mapping is pruned)
    pub async fn remove_for_role(
        &self,
        guild_id: u64,
        for_role_id: u64,
    ) -> Result<Option<u64>, AppError> {
        let _guard = self.locks.lock(guild_id).await;
        let reconciler = self.reconciler();
        let repo = ListenerRoleRepository::new(self.db);

        let mappings = reconciler.live_mappings(guild_id).await?;
        let Some(mapping) = mappings.iter().find(|m| m.for_role_id == for_role_id) else {
            return Ok(None);
        };
        let listener_role_id = mapping.listener_role_id;

        repo.delete_for_role(guild_id, for_role_id).await?;
        reconciler
            .revoke_from_all_locked(guild_id, listener_role_id)
            .await?;

        let still_used = mappings
            .iter()
            .any(|m| m.for_role_id != for_role_id && m.listener_role_id == listener_role_id);
        if still_used {
            reconciler
                .reconcile_guild_locked(guild_id, Utc::now())
                .await?;
        }

        tracing::info!(
            "Disabled monitoring for {} in guild {}",
            for_role_id,
            guild_id
        );

        Ok(Some(listener_role_id))
    }

    /// Removes every listener role from every member, then deletes the guild's mappings.
    ///
    /// # Returns
    /// - `Ok(Some(GuildOutcome))` - Guild was configured and is now reset
    /// - `Ok(None)` - Guild had no mappings
    pub async fn remove_guild(&self, guild_id: u64) -> Result<Option<GuildOutcome>, AppError> {
        let _guard = self.locks.lock(guild_id).await;
        let repo = ListenerRoleRepository::new(self.db);

        if repo.get_by_guild(guild_id).await?.is_empty() {
            return Ok(None);
        }

        let outcome = self.reconciler().teardown_guild_locked(guild_id).await?;
        repo.delete_guild(guild_id).await?;

        tracing::info!("Removed all listener roles of guild {}", guild_id);

        Ok(Some(outcome))
    }

    /// Deletes the guild's mappings without touching members.
    ///
    /// Used when the bot left the guild and can no longer change roles there.
    pub async fn forget_guild(&self, guild_id: u64) -> Result<u64, AppError> {
        let _guard = self.locks.lock(guild_id).await;

        Ok(ListenerRoleRepository::new(self.db)
            .delete_guild(guild_id)
            .await?)
    }

    /// Listener roles of the guild with their for-roles.
    pub async fn overview(&self, guild_id: u64) -> Result<Vec<ListenerRoleGroup>, AppError> {
        let mappings = ListenerRoleRepository::new(self.db)
            .get_by_guild(guild_id)
            .await?;

        Ok(group_by_listener(&mappings))
    }
}
