//! Sponsor recognition read paths.

use sea_orm::DatabaseConnection;

use crate::{
    data::sponsor::SponsorRepository,
    error::AppError,
    model::{
        member::GuildMember,
        sponsor::{SponsorKind, SponsorPlatform, SponsorPlatformRole, SponsorRoles, SponsorStatus},
    },
};

/// Determines a member's sponsor standing from the roles they hold.
///
/// The monthly role takes precedence over the one-time role. Returns `None` for
/// members holding neither.
pub fn sponsor_status(
    roles: &[u64],
    sponsor_roles: &SponsorRoles,
    platforms: &[SponsorPlatform],
    platform_roles: &[SponsorPlatformRole],
) -> Option<SponsorStatus> {
    let holds = |role_id: Option<u64>| role_id.is_some_and(|id| roles.contains(&id));

    let kind = if holds(sponsor_roles.monthly_role_id) {
        SponsorKind::Subscription
    } else if holds(sponsor_roles.one_time_role_id) {
        SponsorKind::OneTime
    } else {
        return None;
    };

    let platforms = platforms
        .iter()
        .filter(|platform| {
            platform_roles
                .iter()
                .any(|pr| pr.platform == platform.name && roles.contains(&pr.role_id))
        })
        .cloned()
        .collect();

    Some(SponsorStatus { kind, platforms })
}

fn sponsor_line(label: &str, role_id: Option<u64>, members: &[GuildMember]) -> String {
    let sponsors: Vec<String> = match role_id {
        Some(role_id) => members
            .iter()
            .filter(|m| !m.bot && m.holds(role_id))
            .map(GuildMember::mention)
            .collect(),
        None => Vec::new(),
    };

    if sponsors.is_empty() {
        format!("**{}** (0): None", label)
    } else {
        format!("**{}** ({}): {}", label, sponsors.len(), sponsors.join(", "))
    }
}

/// Formats the monthly and one-time sponsor lists.
pub fn format_sponsor_list(sponsor_roles: &SponsorRoles, members: &[GuildMember]) -> String {
    [
        sponsor_line("Monthly", sponsor_roles.monthly_role_id, members),
        sponsor_line("One Time", sponsor_roles.one_time_role_id, members),
    ]
    .join("\n")
}

/// Formats one line per platform with its link and roles.
pub fn format_platforms(platforms: &[SponsorPlatform], platform_roles: &[SponsorPlatformRole]) -> String {
    platforms
        .iter()
        .map(|platform| {
            let mut line = format!("- {} `{}`", platform.emoji, platform.name);
            if let Some(url) = &platform.url {
                line.push_str(&format!(" ([link]({}))", url));
            }

            let roles: Vec<String> = platform_roles
                .iter()
                .filter(|pr| pr.platform == platform.name)
                .map(|pr| format!("<@&{}>", pr.role_id))
                .collect();
            if !roles.is_empty() {
                line.push_str(&format!(" -> {}", roles.join(", ")));
            }

            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct SponsorService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SponsorService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sponsor standing of a member of `guild_id` holding `roles`.
    pub async fn status(
        &self,
        guild_id: u64,
        roles: &[u64],
    ) -> Result<Option<SponsorStatus>, AppError> {
        let repo = SponsorRepository::new(self.db);

        let Some(sponsor_roles) = repo.get_roles(guild_id).await? else {
            return Ok(None);
        };
        let platforms = repo.get_platforms(guild_id).await?;
        let platform_roles = repo.get_platform_roles(guild_id).await?;

        Ok(sponsor_status(roles, &sponsor_roles, &platforms, &platform_roles))
    }

    /// Builds the `/sponsors` reply.
    ///
    /// # Returns
    /// - `Ok(String)` - Sponsor lists followed by the platform overview
    /// - `Err(AppError::NotFound)` - Sponsor roles are not configured for the guild
    pub async fn overview(&self, guild_id: u64, members: &[GuildMember]) -> Result<String, AppError> {
        let repo = SponsorRepository::new(self.db);

        let sponsor_roles = repo
            .get_roles(guild_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No sponsor roles configured".to_string()))?;
        let platforms = repo.get_platforms(guild_id).await?;
        let platform_roles = repo.get_platform_roles(guild_id).await?;

        let mut reply = format_sponsor_list(&sponsor_roles, members);
        if !platforms.is_empty() {
            reply.push_str("\n\n**Platforms**\n");
            reply.push_str(&format_platforms(&platforms, &platform_roles));
        }

        Ok(reply)
    }
}
