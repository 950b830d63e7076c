//! `/sponsors` and `/sponsor`.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::AppError,
    model::sponsor::SponsorStatus,
    service::sponsor::SponsorService,
};

pub const SPONSORS: &str = "sponsors";
pub const SPONSOR: &str = "sponsor";

pub fn register() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(SPONSORS).description("List the sponsors of Music Presence"),
        CreateCommand::new(SPONSOR)
            .description("Show whether a member sponsors Music Presence")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Member to look up; defaults to you",
            )),
    ]
}

pub fn format_status(user_id: u64, status: Option<&SponsorStatus>) -> String {
    let Some(status) = status else {
        return format!("<@{}> is not a sponsor", user_id);
    };

    let mut reply = format!("<@{}> is a {} sponsor", user_id, status.kind.label());
    if !status.platforms.is_empty() {
        let platforms: Vec<String> = status
            .platforms
            .iter()
            .map(|p| format!("{} `{}`", p.emoji, p.name))
            .collect();
        reply.push_str(" via ");
        reply.push_str(&platforms.join(", "));
    }
    reply
}

pub async fn run_sponsors(invocation: &Invocation<'_>) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let members = invocation.gateway.member_list(guild_id)?;

    let reply = SponsorService::new(&invocation.state.db)
        .overview(guild_id, &members)
        .await?;

    Ok(Reply::text(reply))
}

pub async fn run_sponsor(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let user_id = args.user("user").unwrap_or(invocation.user_id);

    let member = invocation
        .gateway
        .member_list(guild_id)?
        .into_iter()
        .find(|m| m.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("<@{}> is not a member of this server", user_id)))?;

    let status = SponsorService::new(&invocation.state.db)
        .status(guild_id, &member.roles)
        .await?;

    Ok(Reply::text(format_status(user_id, status.as_ref())))
}
