//! `/giveaway`: random winners among role holders.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::AppError,
    service::giveaway::{draw, eligible_count, format_winners},
};

pub const GIVEAWAY: &str = "giveaway";

pub fn register() -> Vec<CreateCommand> {
    vec![CreateCommand::new(GIVEAWAY)
        .description("Draw random winners among the members with a role")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(
            CreateCommandOption::new(CommandOptionType::Role, "role", "Role members need")
                .required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "winners", "Number of winners")
                .required(true)
                .min_int_value(1),
        )]
}

pub fn run(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let role_id = args.required_role("role")?;
    let winners = usize::try_from(args.required_integer("winners")?).unwrap_or(0);

    let members = invocation.gateway.member_list(guild_id)?;
    let drawn = draw(&mut rand::rng(), &members, role_id, winners)?;

    tracing::info!(
        "Giveaway in guild {} drew {} winners for role {}",
        guild_id,
        drawn.len(),
        role_id
    );

    Ok(Reply::text(format_winners(
        role_id,
        eligible_count(&members, role_id),
        &drawn,
    )))
}
