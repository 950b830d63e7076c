//! `/listening`: registers the invoker's current player as a user override.

use chrono::Utc;
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::AppError,
    model::activity::MemberSnapshot,
    service::{
        overrides::{OverrideService, Registration},
        reconcile::{RoleGateway, RoleReconciler},
    },
};

pub const LISTENING: &str = "listening";

pub fn register() -> Vec<CreateCommand> {
    vec![CreateCommand::new(LISTENING)
        .description("Count the player you are listening with right now as a music player")
        .add_option(CreateCommandOption::new(
            CommandOptionType::Boolean,
            "clear",
            "Remove your registered player instead",
        ))]
}

/// Application ID to register from the invoker's presence.
pub fn application_to_register(snapshot: &MemberSnapshot) -> Result<&str, AppError> {
    snapshot.listening_application_id().ok_or_else(|| {
        AppError::BadRequest(
            "You have no listening activity right now. Start playing something and try again"
                .to_string(),
        )
    })
}

pub fn registration_message(registration: &Registration, app_id: &str) -> String {
    match registration {
        Registration::AlreadyKnown => format!(
            "The player `{}` is already known, there is nothing to register",
            app_id
        ),
        Registration::Registered(_) => format!(
            "Registered the player `{}` for you. It is forgotten after 30 days without use",
            app_id
        ),
    }
}

pub async fn run(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let state = invocation.state;
    let overrides = OverrideService::new(&state.db);

    if args.boolean("clear").unwrap_or(false) {
        let reply = if overrides.clear(invocation.user_id).await? {
            "Removed your registered player"
        } else {
            "You have no registered player"
        };
        reconcile(invocation, guild_id).await?;
        return Ok(Reply::text(reply));
    }

    let snapshot = invocation
        .gateway
        .member(guild_id, invocation.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Your presence is not available yet".to_string()))?;
    let app_id = application_to_register(&snapshot)?;

    let registration = overrides
        .register(invocation.user_id, app_id, &state.registry, Utc::now())
        .await?;
    let reply = registration_message(&registration, app_id);

    if let Registration::Registered(_) = registration {
        reconcile(invocation, guild_id).await?;
    }

    Ok(Reply::text(reply))
}

async fn reconcile(invocation: &Invocation<'_>, guild_id: u64) -> Result<(), AppError> {
    let state = invocation.state;
    RoleReconciler::new(
        &state.db,
        &invocation.gateway,
        &state.registry,
        &state.locks,
    )
    .reconcile_member(guild_id, invocation.user_id, Utc::now())
    .await?;

    Ok(())
}
