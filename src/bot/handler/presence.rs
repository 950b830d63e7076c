//! Presence update handler: the trigger for per-member reconciliation.

use chrono::Utc;
use serenity::all::{Context, Presence};

use crate::{
    bot::gateway::SerenityRoleGateway, service::reconcile::RoleReconciler, state::BotState,
};

/// Re-evaluates a member whose status or activities changed.
///
/// The cache is updated before handlers run, so the member read under the guild lock
/// already carries the new presence.
pub async fn handle_presence_update(state: &BotState, ctx: Context, presence: Presence) {
    let Some(guild_id) = presence.guild_id else {
        return;
    };
    let user_id = presence.user.id;
    let gateway = SerenityRoleGateway::from_context(&ctx);

    let reconciler = RoleReconciler::new(&state.db, &gateway, &state.registry, &state.locks);
    match reconciler
        .reconcile_member(guild_id.get(), user_id.get(), Utc::now())
        .await
    {
        Ok(outcome) if !outcome.is_unchanged() => tracing::debug!(
            "Presence of {} in guild {}: granted {:?}, revoked {:?}",
            user_id,
            guild_id,
            outcome.granted,
            outcome.revoked
        ),
        Ok(_) => {}
        Err(e) => tracing::error!(
            "Failed to reconcile {} in guild {}: {:?}",
            user_id,
            guild_id,
            e
        ),
    }
}
