//! `/role` and `/roles`: listener role configuration.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::{role::RoleConfigError, AppError},
    service::listener_role::{format_overview, ListenerRoleService},
};

pub const ROLE: &str = "role";
pub const ROLES: &str = "roles";

pub fn register() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(ROLE)
            .description("Set or remove the listener role for members with a role")
            .default_member_permissions(Permissions::MANAGE_ROLES)
            .add_option(CreateCommandOption::new(
                CommandOptionType::Role,
                "for_role",
                "Members with this role get the listener role while listening",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::Role,
                "listener_role",
                "Role to give while listening; leave empty to remove",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "summary",
                "Show all configured listener roles afterwards",
            )),
        CreateCommand::new(ROLES)
            .description("Show the configured listener roles")
            .default_member_permissions(Permissions::MANAGE_ROLES)
    ]
}

/// What a `/role` invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    /// Remove every listener role of the guild.
    ResetGuild,
    /// Stop monitoring one for-role.
    RemoveFor { for_role_id: u64 },
    Set {
        for_role_id: u64,
        listener_role_id: u64,
        summary: bool,
    },
}

impl RoleAction {
    pub fn from_args(args: &CommandArgs) -> Result<Self, RoleConfigError> {
        let summary = args.boolean("summary").unwrap_or(false);

        match (args.role("for_role"), args.role("listener_role")) {
            (None, None) => Ok(Self::ResetGuild),
            (None, Some(_)) => Err(RoleConfigError::MissingForRole),
            (Some(for_role_id), None) => Ok(Self::RemoveFor { for_role_id }),
            (Some(for_role_id), Some(listener_role_id)) => Ok(Self::Set {
                for_role_id,
                listener_role_id,
                summary,
            }),
        }
    }
}

pub async fn run_role(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let action = RoleAction::from_args(args)?;

    let state = invocation.state;
    let service = ListenerRoleService::new(
        &state.db,
        &invocation.gateway,
        &state.registry,
        &state.locks,
    );

    let reply = match action {
        RoleAction::ResetGuild => match service.remove_guild(guild_id).await? {
            Some(_) => "Removed all listener roles from all members".to_string(),
            None => "No listener roles configured".to_string(),
        },
        RoleAction::RemoveFor { for_role_id } => {
            match service.remove_for_role(guild_id, for_role_id).await? {
                Some(listener_role_id) => format!(
                    "Disabled monitoring for <@&{}> and removed the <@&{}> role from all members",
                    for_role_id, listener_role_id
                ),
                None => format!("No listener role configured for role <@&{}>", for_role_id),
            }
        }
        RoleAction::Set {
            for_role_id,
            listener_role_id,
            summary,
        } => {
            service
                .set_mapping(guild_id, for_role_id, listener_role_id)
                .await?;

            let mut reply = format!(
                "Listener role for <@&{}> is now <@&{}>",
                for_role_id, listener_role_id
            );
            if summary {
                reply.push('\n');
                reply.push_str(&format_overview(&service.overview(guild_id).await?));
            }
            reply
        }
    };

    Ok(Reply::text(reply))
}

pub async fn run_roles(invocation: &Invocation<'_>) -> Result<Reply, AppError> {
    let guild_id = invocation.guild_id()?;
    let state = invocation.state;

    let groups = ListenerRoleService::new(
        &state.db,
        &invocation.gateway,
        &state.registry,
        &state.locks,
    )
    .overview(guild_id)
    .await?;

    if groups.is_empty() {
        return Ok(Reply::text("No listener roles configured for this server"));
    }

    Ok(Reply::text(format_overview(&groups)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::command::options::OptionValue;

    #[test]
    fn no_roles_resets_the_guild() {
        assert_eq!(
            RoleAction::from_args(&CommandArgs::default()),
            Ok(RoleAction::ResetGuild)
        );
    }

    #[test]
    fn for_role_alone_removes_its_mapping() {
        let args = CommandArgs::default().with("for_role", OptionValue::Role(10));

        assert_eq!(
            RoleAction::from_args(&args),
            Ok(RoleAction::RemoveFor { for_role_id: 10 })
        );
    }

    #[test]
    fn listener_role_needs_a_for_role() {
        let args = CommandArgs::default().with("listener_role", OptionValue::Role(20));

        assert_eq!(
            RoleAction::from_args(&args),
            Err(RoleConfigError::MissingForRole)
        );
    }

    #[test]
    fn both_roles_set_a_mapping() {
        let args = CommandArgs::default()
            .with("for_role", OptionValue::Role(10))
            .with("listener_role", OptionValue::Role(20))
            .with("summary", OptionValue::Boolean(true));

        assert_eq!(
            RoleAction::from_args(&args),
            Ok(RoleAction::Set {
                for_role_id: 10,
                listener_role_id: 20,
                summary: true,
            })
        );
    }
}
