//! Ready event handlers for bot initialization.
//!
//! `ready` fires after every successful gateway handshake and only logs. The
//! one-time initialization runs on `cache_ready`, once every guild of the ready
//! payload is cached: the macro name cache is loaded and the refresh scheduler starts,
//! running its first cycle right away so members get their roles without waiting for
//! the first interval.

use std::sync::{atomic::Ordering, Arc};

use serenity::all::{Context, GuildId, Ready};

use crate::{
    bot::gateway::SerenityRoleGateway, scheduler::refresh::start_scheduler,
    service::macros::MacroService, state::BotState,
};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `_ctx` - Discord context
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(_ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );
}

/// Handles the cache ready event, starting background work on the first one.
///
/// Reconnects fire this event again; the scheduler and cache loading only run once.
pub async fn handle_cache_ready(state: &BotState, ctx: Context, guilds: Vec<GuildId>) {
    tracing::debug!("Cache ready with {} guilds", guilds.len());

    if state.scheduler_started.swap(true, Ordering::AcqRel) {
        return;
    }

    if let Err(e) = MacroService::new(&state.db, &state.macro_names)
        .refresh_cache()
        .await
    {
        tracing::error!("Failed to load macro names: {:?}", e);
    }

    let state = state.clone();
    let gateway = Arc::new(SerenityRoleGateway::from_context(&ctx));

    tokio::spawn(async move {
        match start_scheduler(state.clone(), gateway).await {
            Ok(scheduler) => {
                let _ = state.scheduler.set(scheduler);
            }
            Err(e) => tracing::error!("Failed to start refresh scheduler: {:?}", e),
        }
    });
}
