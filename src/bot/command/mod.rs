//! Slash commands.
//!
//! Every command module exposes a `register` function building its command
//! definitions and one `run` function per command. Runs return a [`Reply`] or an
//! [`AppError`]; [`handle_command`] is the only place that talks to the interaction
//! API, so command logic never deals with deferring, message limits or error
//! reporting.
//!
//! Commands are registered per guild when the guild becomes available. Replies never
//! ping anyone: allowed mentions are always empty.

pub mod giveaway;
pub mod lifecycle;
pub mod listening;
pub mod macros;
pub mod member;
pub mod options;
pub mod role;
pub mod sponsor;
pub mod support;

use serenity::all::{
    CommandInteraction, Context, CreateAllowedMentions, CreateCommand, CreateEmbed,
    CreateInteractionResponseFollowup, EditInteractionResponse, GuildId,
};

use crate::{
    bot::{command::options::CommandArgs, gateway::SerenityRoleGateway},
    error::AppError,
    state::BotState,
};

/// Maximum length of a Discord message.
pub const MESSAGE_LIMIT: usize = 2000;

/// Response of a command.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
    /// Disconnect from the gateway once the reply is sent.
    pub shutdown: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: CreateEmbed) -> Self {
        Self {
            embed: Some(embed),
            ..Default::default()
        }
    }
}

/// Everything a command run needs about its invocation.
pub struct Invocation<'a> {
    pub state: &'a BotState,
    pub ctx: &'a Context,
    pub gateway: SerenityRoleGateway,
    pub guild_id: Option<u64>,
    pub user_id: u64,
}

impl<'a> Invocation<'a> {
    pub fn new(state: &'a BotState, ctx: &'a Context, command: &CommandInteraction) -> Self {
        Self {
            state,
            ctx,
            gateway: SerenityRoleGateway::from_context(ctx),
            guild_id: command.guild_id.map(|id| id.get()),
            user_id: command.user.id.get(),
        }
    }

    /// Guild the command was used in.
    pub fn guild_id(&self) -> Result<u64, AppError> {
        self.guild_id.ok_or_else(|| {
            AppError::BadRequest("This command can only be used in a server".to_string())
        })
    }
}

/// Definitions of every command.
pub fn commands() -> Vec<CreateCommand> {
    let mut commands = Vec::new();
    commands.extend(role::register());
    commands.extend(listening::register());
    commands.extend(lifecycle::register());
    commands.extend(support::register());
    commands.extend(macros::register());
    commands.extend(member::register());
    commands.extend(sponsor::register());
    commands.extend(giveaway::register());
    commands
}

/// Registers every command in a guild, replacing its previous command set.
pub async fn register_commands(ctx: &Context, guild_id: u64) -> Result<(), AppError> {
    let registered = GuildId::new(guild_id)
        .set_commands(&ctx.http, commands())
        .await?;

    tracing::debug!(
        "Registered {} commands in guild {}",
        registered.len(),
        guild_id
    );

    Ok(())
}

/// Commands whose reply only the invoking user sees.
fn is_ephemeral(name: &str) -> bool {
    matches!(name, listening::LISTENING | member::JOINED)
}

async fn run(invocation: &Invocation<'_>, name: &str, args: &CommandArgs) -> Result<Reply, AppError> {
    match name {
        role::ROLE => role::run_role(invocation, args).await,
        role::ROLES => role::run_roles(invocation).await,
        listening::LISTENING => listening::run(invocation, args).await,
        lifecycle::STOP => lifecycle::run_stop(invocation).await,
        support::LOGS => support::run_logs(args),
        support::HELP => support::run_help(invocation, args).await,
        support::AUTOLOG => support::run_autolog(invocation, args).await,
        macros::MACRO => macros::run_macro(invocation, args).await,
        macros::MACROS => macros::run_macros(invocation, args).await,
        member::JOINED => member::run_joined(invocation, args),
        member::DATEROLE => member::run_daterole(invocation, args).await,
        member::TESTERS_COVERAGE => member::run_testers_coverage(invocation),
        sponsor::SPONSORS => sponsor::run_sponsors(invocation).await,
        sponsor::SPONSOR => sponsor::run_sponsor(invocation, args).await,
        giveaway::GIVEAWAY => giveaway::run(invocation, args),
        _ => Err(AppError::NotFound(format!("Unknown command `/{}`", name))),
    }
}

/// Handles a slash-command interaction.
///
/// Defers the response, runs the command and edits the deferred response with the
/// reply. Errors are turned into their user message; internal ones are logged.
pub async fn handle_command(state: &BotState, ctx: &Context, command: &CommandInteraction) {
    let name = command.data.name.as_str();

    let deferred = if is_ephemeral(name) {
        command.defer_ephemeral(&ctx.http).await
    } else {
        command.defer(&ctx.http).await
    };
    if let Err(e) = deferred {
        tracing::error!("Failed to defer /{}: {:?}", name, e);
        return;
    }

    let args = CommandArgs::from_resolved(&command.data.options());
    let invocation = Invocation::new(state, ctx, command);

    let reply = match run(&invocation, name, &args).await {
        Ok(reply) => reply,
        Err(e) => {
            if e.is_internal() {
                tracing::error!("Command /{} failed: {:?}", name, e);
            } else {
                tracing::debug!("Command /{} rejected: {}", name, e);
            }
            Reply::text(e.user_message())
        }
    };

    let shutdown = reply.shutdown;
    if let Err(e) = send_reply(ctx, command, reply).await {
        tracing::error!("Failed to reply to /{}: {:?}", name, e);
    }

    if shutdown {
        lifecycle::shutdown(state).await;
    }
}

async fn send_reply(
    ctx: &Context,
    command: &CommandInteraction,
    reply: Reply,
) -> Result<(), AppError> {
    let chunks = reply
        .content
        .as_deref()
        .map(|content| split_message(content, MESSAGE_LIMIT))
        .unwrap_or_default();
    let mut chunks = chunks.into_iter();

    let mut first = EditInteractionResponse::new().allowed_mentions(CreateAllowedMentions::new());
    if let Some(chunk) = chunks.next() {
        first = first.content(chunk);
    }
    if let Some(embed) = reply.embed {
        first = first.embed(embed);
    }
    command.edit_response(&ctx.http, first).await?;

    for chunk in chunks {
        command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new()
                    .content(chunk)
                    .allowed_mentions(CreateAllowedMentions::new()),
            )
            .await?;
    }

    Ok(())
}

/// Splits a message at line boundaries into chunks of at most `max_length` bytes.
///
/// Lines longer than `max_length` are split at character boundaries.
pub fn split_message(content: &str, max_length: usize) -> Vec<String> {
    if content.len() <= max_length {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if !current.is_empty() && current.len() + line.len() + 1 > max_length {
            chunks.push(std::mem::take(&mut current));
        }

        if line.len() > max_length {
            for c in line.chars() {
                if current.len() + c.len_utf8() > max_length {
                    chunks.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
