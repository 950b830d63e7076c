//! Member update handler.
//!
//! Gaining or losing a for-role changes which listener role a listening member should
//! hold, so role changes are reconciled like presence changes.

use chrono::Utc;
use serenity::all::{Context, GuildMemberUpdateEvent, Member};

use crate::{
    bot::gateway::SerenityRoleGateway, service::reconcile::RoleReconciler, state::BotState,
};

/// Handles a guild member update.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Discord context
/// - `new` - Updated member from the cache, if cached
/// - `event` - Raw update event
pub async fn handle_guild_member_update(
    state: &BotState,
    ctx: Context,
    new: Option<Member>,
    event: GuildMemberUpdateEvent,
) {
    if new.as_ref().is_some_and(|member| member.user.bot) {
        return;
    }

    let gateway = SerenityRoleGateway::from_context(&ctx);
    if let Err(e) = RoleReconciler::new(&state.db, &gateway, &state.registry, &state.locks)
        .reconcile_member(event.guild_id.get(), event.user.id.get(), Utc::now())
        .await
    {
        tracing::error!(
            "Failed to reconcile {} in guild {} after a member update: {:?}",
            event.user.id,
            event.guild_id,
            e
        );
    }
}
