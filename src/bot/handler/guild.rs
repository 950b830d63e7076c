//! Guild event handlers.
//!
//! `guild_create` fires on startup for every guild the bot is in, when it joins a new
//! guild and when a guild comes back after an outage. Each time, the slash commands
//! are registered for the guild and its members are requested with their presences,
//! so the cache holds everything the reconciler reads.
//!
//! `guild_delete` with `unavailable` unset means the bot left or was removed. The
//! guild's mappings are deleted locally; members are not touched because the bot can
//! no longer change their roles.

use serenity::all::{ChunkGuildFilter, Context, Guild, UnavailableGuild};

use crate::{
    bot::{command::register_commands, gateway::SerenityRoleGateway},
    service::listener_role::ListenerRoleService,
    state::BotState,
};

/// Handles a guild becoming available.
///
/// # Arguments
/// - `ctx` - Discord context for command registration and member chunking
/// - `guild` - Guild data from Discord
/// - `is_new` - Whether the bot just joined the guild
pub async fn handle_guild_create(ctx: Context, guild: Guild, is_new: Option<bool>) {
    let guild_id = guild.id;

    tracing::info!(
        "Guild available: {} ({}) - member_count: {}, new: {}",
        guild.name,
        guild_id,
        guild.member_count,
        is_new.unwrap_or(false)
    );

    if let Err(e) = register_commands(&ctx, guild_id.get()).await {
        tracing::error!(
            "Failed to register commands in guild {}: {:?}",
            guild_id,
            e
        );
    }

    ctx.shard
        .chunk_guild(guild_id, None, true, ChunkGuildFilter::None, None);
}

/// Handles the bot leaving a guild.
pub async fn handle_guild_delete(state: &BotState, ctx: Context, incomplete: UnavailableGuild) {
    if incomplete.unavailable {
        tracing::warn!("Guild {} became unavailable", incomplete.id);
        return;
    }

    let gateway = SerenityRoleGateway::from_context(&ctx);
    let service = ListenerRoleService::new(&state.db, &gateway, &state.registry, &state.locks);

    match service.forget_guild(incomplete.id.get()).await {
        Ok(deleted) => tracing::info!(
            "Left guild {}, deleted {} listener role mappings",
            incomplete.id,
            deleted
        ),
        Err(e) => tracing::error!(
            "Failed to delete mappings of guild {}: {:?}",
            incomplete.id,
            e
        ),
    }
}
