//! `/logs`, `/help` and `/autolog`.

use serenity::all::{ChannelType, CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::AppError,
    model::support::{HelpTopic, Platform},
    service::{
        autolog::{AutologService, AutologState},
        help::{download_urls, format_download_links, help_message, logs_response},
    },
};

pub const LOGS: &str = "logs";
pub const HELP: &str = "help";
pub const AUTOLOG: &str = "autolog";

pub fn register() -> Vec<CreateCommand> {
    let platform = Platform::ALL.iter().fold(
        CreateCommandOption::new(CommandOptionType::String, "platform", "Your operating system"),
        |option, platform| option.add_string_choice(platform.name(), platform.name()),
    );
    let topic = HelpTopic::ALL.iter().fold(
        CreateCommandOption::new(CommandOptionType::String, "topic", "What you need help with"),
        |option, topic| option.add_string_choice(topic.name(), topic.name()),
    );

    vec![
        CreateCommand::new(LOGS)
            .description("Where to find the Music Presence log file")
            .add_option(platform),
        CreateCommand::new(HELP)
            .description("Help with installing and using Music Presence")
            .add_option(topic),
        CreateCommand::new(AUTOLOG)
            .description("Answer log file requests in a channel automatically")
            .default_member_permissions(Permissions::MANAGE_CHANNELS)
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "state", "Turn it on or off")
                    .required(true)
                    .add_string_choice("on", "on")
                    .add_string_choice("off", "off"),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "Channel to observe; leave empty with off to clear all channels",
                )
                .channel_types(vec![ChannelType::Text]),
            ),
    ]
}

pub fn run_logs(args: &CommandArgs) -> Result<Reply, AppError> {
    let platform = args.string("platform").and_then(Platform::from_name);

    Ok(Reply::text(logs_response(platform)))
}

pub async fn run_help(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let topic = args.string("topic").and_then(HelpTopic::from_name);

    let mut reply = help_message(topic);
    if topic == Some(HelpTopic::Install) {
        let version = invocation.state.releases.latest_version().await;
        reply.push('\n');
        reply.push_str(&format_download_links(&download_urls(version.as_deref())));
    }

    Ok(Reply::text(reply))
}

pub fn parse_state(value: &str) -> Result<AutologState, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "on" => Ok(AutologState::On),
        "off" => Ok(AutologState::Off),
        _ => Err(AppError::BadRequest(format!(
            "Unknown state `{}`, use on or off",
            value
        ))),
    }
}

pub async fn run_autolog(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let state = parse_state(args.required_string("state")?)?;

    let reply = AutologService::new(&invocation.state.db)
        .set_state(guild_id, args.channel("channel"), state)
        .await?;

    Ok(Reply::text(reply))
}
