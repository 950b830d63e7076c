use serenity::all::{
    Context, EventHandler, Guild, GuildId, GuildMemberUpdateEvent, Interaction, Member, Message,
    Presence, Ready, UnavailableGuild,
};
use serenity::async_trait;

use crate::state::BotState;

pub mod guild;
pub mod interaction;
pub mod member;
pub mod message;
pub mod presence;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called once every guild from the ready payload is in the cache
    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        ready::handle_cache_ready(&self.state, ctx, guilds).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        guild::handle_guild_create(ctx, guild, is_new).await;
    }

    /// Called when the bot leaves a guild or a guild becomes unavailable
    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        guild::handle_guild_delete(&self.state, ctx, incomplete).await;
    }

    /// Called when a member's status or activities change
    async fn presence_update(&self, ctx: Context, new_data: Presence) {
        presence::handle_presence_update(&self.state, ctx, new_data).await;
    }

    /// Called when a member's roles change
    async fn guild_member_update(
        &self,
        ctx: Context,
        _old_if_available: Option<Member>,
        new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        member::handle_guild_member_update(&self.state, ctx, new, event).await;
    }

    /// Called when a message is sent in a channel the bot can see
    async fn message(&self, ctx: Context, new_message: Message) {
        message::handle_message(&self.state, ctx, new_message).await;
    }

    /// Called for slash commands and autocomplete requests
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.state, ctx, interaction).await;
    }
}
