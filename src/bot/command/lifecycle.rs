//! `/stop` and the shutdown path shared with Ctrl-C.

use serenity::all::{CreateCommand, Permissions};

use crate::{
    bot::command::{Invocation, Reply},
    error::AppError,
    service::reconcile::{RoleGateway, RoleReconciler},
    state::BotState,
};

pub const STOP: &str = "stop";

pub fn register() -> Vec<CreateCommand> {
    vec![CreateCommand::new(STOP)
        .description("Remove all listener roles and stop the bot")
        .default_member_permissions(Permissions::ADMINISTRATOR)]
}

/// Removes every listener role the bot manages, in every guild.
///
/// Mappings are kept so the roles come back on the next start.
pub async fn teardown(state: &BotState, gateway: &dyn RoleGateway) {
    let outcome = RoleReconciler::new(&state.db, gateway, &state.registry, &state.locks)
        .teardown_all()
        .await;

    tracing::info!(
        "Teardown revoked {} listener roles from {} members ({} failed)",
        outcome.revoked,
        outcome.members,
        outcome.failed
    );
}

/// Disconnects every shard, which ends the client's run loop.
pub async fn shutdown(state: &BotState) {
    match state.shard_manager.get() {
        Some(shard_manager) => {
            tracing::info!("Shutting down");
            shard_manager.shutdown_all().await;
        }
        None => tracing::warn!("Shutdown requested before the client started"),
    }
}

pub async fn run_stop(invocation: &Invocation<'_>) -> Result<Reply, AppError> {
    tracing::info!("Stop requested by {}", invocation.user_id);

    teardown(invocation.state, &invocation.gateway).await;

    Ok(Reply {
        shutdown: true,
        ..Reply::text("Removed all roles, stopping now")
    })
}
