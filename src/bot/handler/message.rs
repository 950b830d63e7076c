use serenity::all::{Context, CreateAllowedMentions, CreateMessage, Message};

use crate::{service::autolog::AutologService, service::help::logs_response, state::BotState};

/// Replies with the log file locations to log requests in observed channels
pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    // Only guild channels can be observed
    let Some(guild_id) = message.guild_id else {
        return;
    };
    if message.author.bot {
        return;
    }

    let should_reply = match AutologService::new(&state.db)
        .should_reply(guild_id.get(), message.channel_id.get(), &message.content)
        .await
    {
        Ok(should_reply) => should_reply,
        Err(e) => {
            tracing::error!("Failed to check autolog channel: {:?}", e);
            return;
        }
    };
    if !should_reply {
        return;
    }

    let reply = CreateMessage::new()
        .content(logs_response(None))
        .reference_message(&message)
        .allowed_mentions(CreateAllowedMentions::new());

    if let Err(e) = message.channel_id.send_message(&ctx.http, reply).await {
        tracing::error!(
            "Failed to answer log request in channel {}: {:?}",
            message.channel_id,
            e
        );
    }
}
