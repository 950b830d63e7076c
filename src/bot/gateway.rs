//! Serenity implementation of the role gateway, plus conversions from Serenity models.
//!
//! Member and presence data is read from the cache (the `GUILD_MEMBERS` and
//! `GUILD_PRESENCES` intents keep it populated); role mutations go through the HTTP
//! client. Role lookups fall back to the HTTP API when the guild is not cached.

use std::sync::Arc;

use chrono::DateTime;
use serenity::{
    all::{
        ActivityFlags, ActivityType, Cache, Context, GuildId, Http, Member, OnlineStatus,
        Presence, Role, RoleId, UserId,
    },
    async_trait,
    http::HttpError,
};

use crate::{
    error::AppError,
    model::{
        activity::{Activity, MemberSnapshot, PresenceStatus},
        listener_role::GuildRole,
        member::GuildMember,
    },
    service::reconcile::RoleGateway,
};

const AUDIT_LOG_REASON: &str = "Listener role update";

pub fn presence_status(status: OnlineStatus) -> PresenceStatus {
    match status {
        OnlineStatus::Online => PresenceStatus::Online,
        OnlineStatus::Idle => PresenceStatus::Idle,
        OnlineStatus::DoNotDisturb => PresenceStatus::DoNotDisturb,
        OnlineStatus::Invisible => PresenceStatus::Invisible,
        _ => PresenceStatus::Offline,
    }
}

pub fn activity(activity: &serenity::all::Activity) -> Activity {
    Activity::classify(
        activity.kind == ActivityType::Listening,
        &activity.name,
        activity.application_id.map(|id| id.get()),
        activity
            .flags
            .is_some_and(|flags| flags.contains(ActivityFlags::SYNC)),
        activity.party.as_ref().and_then(|party| party.id.as_deref()),
    )
}

/// Builds a snapshot from a member and their presence.
///
/// Members without a presence are treated as offline.
pub fn member_snapshot(member: &Member, presence: Option<&Presence>) -> MemberSnapshot {
    let (status, activities) = match presence {
        Some(presence) => (
            presence_status(presence.status),
            presence.activities.iter().map(activity).collect(),
        ),
        None => (PresenceStatus::Offline, Vec::new()),
    };

    MemberSnapshot {
        guild_id: member.guild_id.get(),
        user_id: member.user.id.get(),
        status,
        activities,
        roles: member.roles.iter().map(|id| id.get()).collect(),
    }
}

pub fn guild_member(member: &Member) -> GuildMember {
    GuildMember {
        user_id: member.user.id.get(),
        bot: member.user.bot,
        joined_at: member
            .joined_at
            .and_then(|ts| DateTime::from_timestamp(ts.unix_timestamp(), 0)),
        roles: member.roles.iter().map(|id| id.get()).collect(),
    }
}

pub fn guild_role(role: &Role) -> GuildRole {
    GuildRole {
        role_id: role.id.get(),
        position: role.position,
        permissions: role.permissions.bits(),
        managed: role.managed,
    }
}

#[derive(Clone)]
pub struct SerenityRoleGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityRoleGateway {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    pub fn from_context(ctx: &Context) -> Self {
        Self::new(ctx.http.clone(), ctx.cache.clone())
    }

    /// Cached members of a guild.
    pub fn member_list(&self, guild_id: u64) -> Result<Vec<GuildMember>, AppError> {
        let guild = self
            .cache
            .guild(GuildId::new(guild_id))
            .ok_or_else(|| not_cached(guild_id))?;

        Ok(guild.members.values().map(guild_member).collect())
    }

}

fn is_not_found(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

fn not_cached(guild_id: u64) -> AppError {
    AppError::NotFound(format!("Guild {} is not available yet", guild_id))
}

#[async_trait]
impl RoleGateway for SerenityRoleGateway {
    fn guild_ids(&self) -> Vec<u64> {
        self.cache.guilds().iter().map(|id| id.get()).collect()
    }

    async fn guild_members(&self, guild_id: u64) -> Result<Vec<MemberSnapshot>, AppError> {
        let guild = self
            .cache
            .guild(GuildId::new(guild_id))
            .ok_or_else(|| not_cached(guild_id))?;

        Ok(guild
            .members
            .values()
            .map(|member| member_snapshot(member, guild.presences.get(&member.user.id)))
            .collect())
    }

    /// Reads the member from the cache, falling back to the HTTP API for members the
    /// cache has not seen yet. The cached presence is used in both cases.
    async fn member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<MemberSnapshot>, AppError> {
        let guild_id = GuildId::new(guild_id);
        let user_id = UserId::new(user_id);

        let presence = {
            let Some(guild) = self.cache.guild(guild_id) else {
                return Err(not_cached(guild_id.get()));
            };
            if let Some(member) = guild.members.get(&user_id) {
                return Ok(Some(member_snapshot(member, guild.presences.get(&user_id))));
            }
            guild.presences.get(&user_id).cloned()
        };

        match self.http.get_member(guild_id, user_id).await {
            Ok(member) => Ok(Some(member_snapshot(&member, presence.as_ref()))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_role(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Option<GuildRole>, AppError> {
        let cached = self.cache.guild(GuildId::new(guild_id)).map(|guild| {
            guild
                .roles
                .get(&RoleId::new(role_id))
                .map(guild_role)
        });
        if let Some(role) = cached {
            return Ok(role);
        }

        let roles = self.http.get_guild_roles(GuildId::new(guild_id)).await?;

        Ok(roles
            .iter()
            .find(|role| role.id.get() == role_id)
            .map(guild_role))
    }

    async fn bot_top_position(&self, guild_id: u64) -> Result<u16, AppError> {
        let bot_id = self.cache.current_user().id;

        let cached = self.cache.guild(GuildId::new(guild_id)).and_then(|guild| {
            let member = guild.members.get(&bot_id)?;
            Some(
                member
                    .roles
                    .iter()
                    .filter_map(|id| guild.roles.get(id))
                    .map(|role| role.position)
                    .max()
                    .unwrap_or(0),
            )
        });
        if let Some(position) = cached {
            return Ok(position);
        }

        let guild_id = GuildId::new(guild_id);
        let member = self.http.get_member(guild_id, bot_id).await?;
        let roles = self.http.get_guild_roles(guild_id).await?;

        Ok(roles
            .iter()
            .filter(|role| member.roles.contains(&role.id))
            .map(|role| role.position)
            .max()
            .unwrap_or(0))
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<(), AppError> {
        self.http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_LOG_REASON),
            )
            .await?;

        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), AppError> {
        self.http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_LOG_REASON),
            )
            .await?;

        Ok(())
    }
}
