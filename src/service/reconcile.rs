//! Role reconciler: brings members' held listener roles in line with their presence.
//!
//! All Discord access goes through [`RoleGateway`]. Role mutations that Discord rejects
//! are logged and counted, never propagated, so one member with a role the bot cannot
//! touch does not abort a guild-wide pass. Mappings whose listener role no longer
//! resolves are pruned before they are used.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serenity::async_trait;

use crate::{
    data::{listener_role::ListenerRoleRepository, user_app::UserAppRepository},
    error::AppError,
    model::{
        activity::MemberSnapshot,
        listener_role::{GuildRole, ListenerRoleMapping},
        user_app::UserApp,
    },
    service::{catalog::KnownAppRegistry, lock::GuildLocks, overrides::OverrideService, presence},
};

/// Role operations the reconciler needs from the chat platform.
#[async_trait]
pub trait RoleGateway: Send + Sync {
    /// Guilds the bot is currently in.
    fn guild_ids(&self) -> Vec<u64>;

    /// Presence snapshots of every member of a guild.
    async fn guild_members(&self, guild_id: u64) -> Result<Vec<MemberSnapshot>, AppError>;

    /// Presence snapshot of one member; `Ok(None)` if they are not in the guild.
    async fn member(&self, guild_id: u64, user_id: u64)
        -> Result<Option<MemberSnapshot>, AppError>;

    /// Resolves a role; `Ok(None)` means the role no longer exists.
    async fn resolve_role(&self, guild_id: u64, role_id: u64)
        -> Result<Option<GuildRole>, AppError>;

    /// Position of the bot's highest role in the guild.
    async fn bot_top_position(&self, guild_id: u64) -> Result<u16, AppError>;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<(), AppError>;

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64)
        -> Result<(), AppError>;
}

/// Role changes made for one member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberOutcome {
    pub granted: Vec<u64>,
    pub revoked: Vec<u64>,
    /// Mutations rejected by the platform.
    pub failed: usize,
}

impl MemberOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty()
    }
}

/// Totals of a guild-wide pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildOutcome {
    pub members: usize,
    pub granted: usize,
    pub revoked: usize,
    pub failed: usize,
}

impl GuildOutcome {
    fn add(&mut self, member: &MemberOutcome) {
        self.members += 1;
        self.granted += member.granted.len();
        self.revoked += member.revoked.len();
        self.failed += member.failed;
    }

    fn merge(&mut self, other: &GuildOutcome) {
        self.members += other.members;
        self.granted += other.granted;
        self.revoked += other.revoked;
        self.failed += other.failed;
    }
}

/// Picks the listener role a listening member should hold.
///
/// Held roles are scanned from the end of the member's role list backwards and the
/// first one that is a mapped for-role decides. Returns `None` when no held role is
/// mapped.
pub fn select_listener_role(roles: &[u64], mappings: &[ListenerRoleMapping]) -> Option<u64> {
    roles.iter().rev().find_map(|role_id| {
        mappings
            .iter()
            .find(|m| m.for_role_id == *role_id)
            .map(|m| m.listener_role_id)
    })
}

/// Distinct listener roles of a guild's mappings, in mapping order.
pub fn listener_role_ids(mappings: &[ListenerRoleMapping]) -> Vec<u64> {
    let mut ids: Vec<u64> = Vec::new();
    for mapping in mappings {
        if !ids.contains(&mapping.listener_role_id) {
            ids.push(mapping.listener_role_id);
        }
    }
    ids
}

pub struct RoleReconciler<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn RoleGateway,
    registry: &'a KnownAppRegistry,
    locks: &'a GuildLocks,
}

impl<'a> RoleReconciler<'a> {
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

    /// Reconciles a single member after a presence change.
    ///
    /// The member is read through the gateway only once the guild lock is held, so a
    /// guild pass that finished in the meantime is already reflected in their roles.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of the member
    /// - `user_id` - Member to reconcile
    /// - `now` - Evaluation time, used for the override timestamp bump
    ///
    /// # Returns
    /// - `Ok(MemberOutcome)` - Roles granted and revoked; empty if the member is gone
    /// - `Err(AppError)` - Database or role lookup error
    pub async fn reconcile_member(
        &self,
        guild_id: u64,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<MemberOutcome, AppError> {
        let _guard = self.locks.lock(guild_id).await;

        let mappings = self.live_mappings(guild_id).await?;
        if mappings.is_empty() {
            return Ok(MemberOutcome::default());
        }

        let Some(snapshot) = self.gateway.member(guild_id, user_id).await? else {
            tracing::debug!("Member {} is not in guild {}, skipping", user_id, guild_id);
            return Ok(MemberOutcome::default());
        };

        let user_override = UserAppRepository::new(self.db)
            .find_by_user(user_id)
            .await?;

        self.reconcile_snapshot(&snapshot, &mappings, user_override.as_ref(), now)
            .await
    }

    /// Reconciles every member of a guild. Acquires the guild lock.
    pub async fn reconcile_guild(
        &self,
        guild_id: u64,
        now: DateTime<Utc>,
    ) -> Result<GuildOutcome, AppError> {
        let _guard = self.locks.lock(guild_id).await;

        self.reconcile_guild_locked(guild_id, now).await
    }

    /// Reconciles every member of a guild; the caller holds the guild lock.
    pub async fn reconcile_guild_locked(
        &self,
        guild_id: u64,
        now: DateTime<Utc>,
    ) -> Result<GuildOutcome, AppError> {
        let mut outcome = GuildOutcome::default();

        let mappings = self.live_mappings(guild_id).await?;
        if mappings.is_empty() {
            return Ok(outcome);
        }

        let overrides: HashMap<u64, UserApp> = UserAppRepository::new(self.db)
            .get_all()
            .await?
            .into_iter()
            .map(|user_app| (user_app.user_id, user_app))
            .collect();

        for snapshot in self.gateway.guild_members(guild_id).await? {
            let member = self
                .reconcile_snapshot(&snapshot, &mappings, overrides.get(&snapshot.user_id), now)
                .await?;
            outcome.add(&member);
        }

        tracing::debug!(
            "Reconciled {} members in guild {} ({} granted, {} revoked, {} failed)",
            outcome.members,
            guild_id,
            outcome.granted,
            outcome.revoked,
            outcome.failed
        );

        Ok(outcome)
    }

    /// Reconciles every guild the bot is in that has at least one mapping.
    ///
    /// A failing guild is logged and skipped.
    pub async fn reconcile_all(&self, now: DateTime<Utc>) -> GuildOutcome {
        let mut total = GuildOutcome::default();

        let configured = match ListenerRoleRepository::new(self.db).guild_ids().await {
            Ok(guild_ids) => guild_ids,
            Err(e) => {
                tracing::error!("Failed to load configured guilds: {}", e);
                return total;
            }
        };

        for guild_id in self.gateway.guild_ids() {
            if !configured.contains(&guild_id) {
                continue;
            }

            match self.reconcile_guild(guild_id, now).await {
                Ok(outcome) => total.merge(&outcome),
                Err(e) => tracing::error!("Failed to reconcile guild {}: {}", guild_id, e),
            }
        }

        total
    }

    /// Removes every listener role of the guild from every member holding it.
    ///
    /// Mappings are kept. Acquires the guild lock.
    pub async fn teardown_guild(&self, guild_id: u64) -> Result<GuildOutcome, AppError> {
        let _guard = self.locks.lock(guild_id).await;

        self.teardown_guild_locked(guild_id).await
    }

    /// Same as [`Self::teardown_guild`]; the caller holds the guild lock.
    pub async fn teardown_guild_locked(&self, guild_id: u64) -> Result<GuildOutcome, AppError> {
        let mut outcome = GuildOutcome::default();

        let listener_roles = listener_role_ids(&self.live_mappings(guild_id).await?);
        if listener_roles.is_empty() {
            return Ok(outcome);
        }

        for snapshot in self.gateway.guild_members(guild_id).await? {
            let held: Vec<u64> = listener_roles
                .iter()
                .copied()
                .filter(|role_id| snapshot.holds(*role_id))
                .collect();
            if held.is_empty() {
                continue;
            }

            let mut member = MemberOutcome::default();
            for role_id in held {
                self.revoke(&snapshot, role_id, &mut member).await;
            }
            outcome.add(&member);
        }

        Ok(outcome)
    }

    /// Tears down every guild the bot is in. Failures are logged per guild.
    pub async fn teardown_all(&self) -> GuildOutcome {
        let mut total = GuildOutcome::default();

        for guild_id in self.gateway.guild_ids() {
            match self.teardown_guild(guild_id).await {
                Ok(outcome) => total.merge(&outcome),
                Err(e) => tracing::error!("Failed to remove listener roles in guild {}: {}", guild_id, e),
            }
        }

        tracing::info!("Removed {} listener roles from members", total.revoked);

        total
    }

    /// Removes one listener role from every member holding it; the caller holds the lock.
    pub async fn revoke_from_all_locked(
        &self,
        guild_id: u64,
        listener_role_id: u64,
    ) -> Result<GuildOutcome, AppError> {
        let mut outcome = GuildOutcome::default();

        for snapshot in self.gateway.guild_members(guild_id).await? {
            if !snapshot.holds(listener_role_id) {
                continue;
            }
            let mut member = MemberOutcome::default();
            self.revoke(&snapshot, listener_role_id, &mut member).await;
            outcome.add(&member);
        }

        Ok(outcome)
    }

    /// Loads the guild's mappings, pruning those whose listener role no longer exists.
    pub async fn live_mappings(&self, guild_id: u64) -> Result<Vec<ListenerRoleMapping>, AppError> {
        let repo = ListenerRoleRepository::new(self.db);
        let mappings = repo.get_by_guild(guild_id).await?;

        let mut missing = Vec::new();
        for role_id in listener_role_ids(&mappings) {
            if self.gateway.resolve_role(guild_id, role_id).await?.is_none() {
                tracing::info!(
                    "Listener role {} no longer exists in guild {}, removing its mappings",
                    role_id,
                    guild_id
                );
                repo.delete_by_listener_role(guild_id, role_id).await?;
                missing.push(role_id);
            }
        }

        Ok(mappings
            .into_iter()
            .filter(|m| !missing.contains(&m.listener_role_id))
            .collect())
    }

    async fn reconcile_snapshot(
        &self,
        snapshot: &MemberSnapshot,
        mappings: &[ListenerRoleMapping],
        user_override: Option<&UserApp>,
        now: DateTime<Utc>,
    ) -> Result<MemberOutcome, AppError> {
        let evaluation = presence::evaluate(snapshot, self.registry, user_override);

        if let Some(app_id) = evaluation.matched_override() {
            OverrideService::new(self.db)
                .bump_if_stale(snapshot.user_id, app_id, now)
                .await?;
        }

        let target = if evaluation.listening {
            select_listener_role(&snapshot.roles, mappings)
        } else {
            None
        };

        tracing::debug!(
            "Member {} in guild {}: listening={}, listener role={:?}",
            snapshot.user_id,
            snapshot.guild_id,
            evaluation.listening,
            target
        );

        Ok(self.apply(snapshot, mappings, target).await)
    }

    /// Grants `target` if missing and revokes every other held listener role.
    async fn apply(
        &self,
        snapshot: &MemberSnapshot,
        mappings: &[ListenerRoleMapping],
        target: Option<u64>,
    ) -> MemberOutcome {
        let mut outcome = MemberOutcome::default();

        for role_id in listener_role_ids(mappings) {
            if Some(role_id) != target && snapshot.holds(role_id) {
                self.revoke(snapshot, role_id, &mut outcome).await;
            }
        }

        if let Some(role_id) = target {
            if !snapshot.holds(role_id) {
                match self
                    .gateway
                    .add_role(snapshot.guild_id, snapshot.user_id, role_id)
                    .await
                {
                    Ok(()) => outcome.granted.push(role_id),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to add role {} to member {} in guild {}: {}",
                            role_id,
                            snapshot.user_id,
                            snapshot.guild_id,
                            e
                        );
                        outcome.failed += 1;
                    }
                }
            }
        }

        outcome
    }

    async fn revoke(&self, snapshot: &MemberSnapshot, role_id: u64, outcome: &mut MemberOutcome) {
        match self
            .gateway
            .remove_role(snapshot.guild_id, snapshot.user_id, role_id)
            .await
        {
            Ok(()) => outcome.revoked.push(role_id),
            Err(e) => {
                tracing::warn!(
                    "Failed to remove role {} from member {} in guild {}: {}",
                    role_id,
                    snapshot.user_id,
                    snapshot.guild_id,
                    e
                );
                outcome.failed += 1;
            }
        }
    }
}
