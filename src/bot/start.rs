use serenity::all::{Client, GatewayIntents};

use crate::{
    bot::{command::lifecycle, gateway::SerenityRoleGateway, handler::Handler},
    error::AppError,
    state::BotState,
};

/// Starts the Discord bot and blocks until it shuts down.
///
/// Ctrl-C removes every managed listener role before disconnecting, the same way
/// `/stop` does.
///
/// # Arguments
/// - `state` - Shared bot state
///
/// # Returns
/// - `Ok(())` if the bot ran and shut down cleanly
/// - `Err(AppError)` if bot initialization or connection fails
pub async fn start_bot(state: BotState) -> Result<(), AppError> {
    // GUILD_MEMBERS, GUILD_PRESENCES and MESSAGE_CONTENT are privileged intents and
    // must be enabled in the Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_PRESENCES
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&state.config.discord_bot_token, intents)
        .event_handler(Handler::new(state.clone()))
        .await?;

    let _ = state.shard_manager.set(client.shard_manager.clone());

    let gateway = SerenityRoleGateway::new(client.http.clone(), client.cache.clone());
    let shutdown_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {:?}", e);
            return;
        }

        tracing::info!("Ctrl-C received, removing listener roles");
        lifecycle::teardown(&shutdown_state, &gateway).await;
        lifecycle::shutdown(&shutdown_state).await;
    });

    tracing::info!("Starting Discord bot...");

    client.start().await?;

    tracing::info!("Discord bot stopped");

    Ok(())
}
