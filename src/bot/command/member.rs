//! `/joined`, `/daterole` and `/testers-coverage`.

use std::sync::Arc;

use chrono::Utc;
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::AppError,
    service::{
        member::{
            assign_role_by_join_date, format_join_stats, format_tester_coverage, join_stats,
            parse_date, tester_coverage,
        },
        reconcile::RoleGateway,
    },
};

pub const JOINED: &str = "joined";
pub const DATEROLE: &str = "daterole";
pub const TESTERS_COVERAGE: &str = "testers-coverage";

pub fn register() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(JOINED)
            .description("When a member joined the server")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Member to look up; defaults to you",
            )),
        CreateCommand::new(DATEROLE)
            .description("Give a role to every member who joined on or after a date")
            .default_member_permissions(Permissions::MANAGE_ROLES)
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "Role to give")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "date", "Date as YYYY-MM-DD")
                    .required(true),
            ),
        CreateCommand::new(TESTERS_COVERAGE)
            .description("Which operating systems the beta testers cover")
            .default_member_permissions(Permissions::MANAGE_ROLES),
    ]
}

pub fn run_joined(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let user_id = args.user("user").unwrap_or(invocation.user_id);

    let members = invocation.gateway.member_list(guild_id)?;
    let stats = join_stats(&members, user_id, Utc::now())
        .ok_or_else(|| AppError::NotFound(format!("<@{}> is not a member of this server", user_id)))?;

    Ok(Reply::text(format_join_stats(user_id, &stats)))
}

pub async fn run_daterole(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let role_id = args.required_role("role")?;
    let after = parse_date(args.required_string("date")?)?;

    let members = invocation.gateway.member_list(guild_id)?;
    let gateway: Arc<dyn RoleGateway> = Arc::new(invocation.gateway.clone());

    let report = assign_role_by_join_date(
        gateway,
        invocation.state.bulk_limiter.clone(),
        guild_id,
        role_id,
        after,
        members,
    )
    .await;

    Ok(Reply::text(report.message(role_id)))
}

pub fn run_testers_coverage(invocation: &Invocation<'_>) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let config = &invocation.state.config;

    let beta_tester_role_id = config.beta_tester_role_id.ok_or_else(|| {
        AppError::NotFound("No beta tester role configured".to_string())
    })?;
    if config.os_role_ids.is_empty() {
        return Err(AppError::NotFound(
            "No operating system roles configured".to_string(),
        ));
    }

    let members = invocation.gateway.member_list(guild_id)?;
    let coverage = tester_coverage(&members, beta_tester_role_id, &config.os_role_ids);

    Ok(Reply::text(format_tester_coverage(&coverage)))
}
