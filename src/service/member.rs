//! Member utilities: join statistics, role grants by join date and tester coverage.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{error::AppError, model::member::GuildMember, service::reconcile::RoleGateway};

/// Join details of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStats {
    pub joined_at: DateTime<Utc>,
    /// Whole days since joining.
    pub days: i64,
    /// 1-based position among current members ordered by join time.
    pub position: usize,
    pub member_count: usize,
}

/// Computes the join statistics of `user_id` among `members`.
///
/// # Returns
/// - `Some(JoinStats)` - The member is present and has a join time
/// - `None` - Unknown member or join time
pub fn join_stats(members: &[GuildMember], user_id: u64, now: DateTime<Utc>) -> Option<JoinStats> {
    let joined_at = members
        .iter()
        .find(|m| m.user_id == user_id)?
        .joined_at?;

    let earlier = members
        .iter()
        .filter_map(|m| m.joined_at)
        .filter(|other| *other < joined_at)
        .count();

    Some(JoinStats {
        joined_at,
        days: (now - joined_at).num_days(),
        position: earlier + 1,
        member_count: members.len(),
    })
}

pub fn format_join_stats(user_id: u64, stats: &JoinStats) -> String {
    format!(
        "<@{}> joined <t:{}:F> (<t:{}:R>), {} days ago.\nThey were member #{} of the {} current members to join.",
        user_id,
        stats.joined_at.timestamp(),
        stats.joined_at.timestamp(),
        stats.days,
        stats.position,
        stats.member_count
    )
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date `{}`, use YYYY-MM-DD", value)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRoleReport {
    pub granted: usize,
    /// Eligible members already holding the role.
    pub skipped: usize,
    pub failed: usize,
}

impl DateRoleReport {
    pub fn message(&self, role_id: u64) -> String {
        format!(
            "Assigned <@&{}> to {} members ({} already had it, {} failed)",
            role_id, self.granted, self.skipped, self.failed
        )
    }
}

/// Grants `role_id` to every non-bot member who joined after the start of `after`.
///
/// At most `limiter`'s permits worth of role grants are in flight at once.
///
/// # Arguments
/// - `gateway` - Role gateway used for the grants
/// - `limiter` - Bulk mutation limiter shared by every bulk command
/// - `guild_id` - Discord guild ID
/// - `role_id` - Role to grant
/// - `after` - Members who joined on or after this date (UTC) get the role
/// - `members` - Current guild members
pub async fn assign_role_by_join_date(
    gateway: Arc<dyn RoleGateway>,
    limiter: Arc<Semaphore>,
    guild_id: u64,
    role_id: u64,
    after: NaiveDate,
    members: Vec<GuildMember>,
) -> DateRoleReport {
    let threshold = after.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    let mut report = DateRoleReport::default();
    let mut tasks = JoinSet::new();

    for member in members {
        if member.bot {
            continue;
        }
        let eligible = match (member.joined_at, threshold) {
            (Some(joined_at), Some(threshold)) => joined_at >= threshold,
            _ => false,
        };
        if !eligible {
            continue;
        }
        if member.holds(role_id) {
            report.skipped += 1;
            continue;
        }

        let gateway = gateway.clone();
        let limiter = limiter.clone();
        tasks.spawn(async move {
            let Ok(_permit) = limiter.acquire_owned().await else {
                return false;
            };
            match gateway.add_role(guild_id, member.user_id, role_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        "Failed to add role {} to member {} in guild {}: {}",
                        role_id,
                        member.user_id,
                        guild_id,
                        e
                    );
                    false
                }
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(true) => report.granted += 1,
            Ok(false) => report.failed += 1,
            Err(e) => {
                tracing::error!("Role grant task failed: {}", e);
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        "Date role {} in guild {}: {} granted, {} skipped, {} failed",
        role_id,
        guild_id,
        report.granted,
        report.skipped,
        report.failed
    );

    report
}

/// Which beta testers cover each OS role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterCoverage {
    pub testers: Vec<u64>,
    /// OS role and the testers holding it, in configuration order.
    pub by_os: Vec<(u64, Vec<u64>)>,
}

pub fn tester_coverage(
    members: &[GuildMember],
    beta_tester_role_id: u64,
    os_role_ids: &[u64],
) -> TesterCoverage {
    let testers: Vec<&GuildMember> = members
        .iter()
        .filter(|m| m.holds(beta_tester_role_id))
        .collect();

    let by_os = os_role_ids
        .iter()
        .map(|os_role_id| {
            let covering = testers
                .iter()
                .filter(|m| m.holds(*os_role_id))
                .map(|m| m.user_id)
                .collect();
            (*os_role_id, covering)
        })
        .collect();

    TesterCoverage {
        testers: testers.iter().map(|m| m.user_id).collect(),
        by_os,
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn mentions(user_ids: &[u64]) -> String {
    user_ids
        .iter()
        .map(|id| format!("<@{}>", id))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_tester_coverage(coverage: &TesterCoverage) -> String {
    let mut lines = vec![
        "**Music Presence users tests coverage**".to_string(),
        format!(
            "{} beta tester{}",
            coverage.testers.len(),
            plural(coverage.testers.len())
        ),
        format!("> {}", mentions(&coverage.testers)),
    ];

    for (os_role_id, covering) in &coverage.by_os {
        lines.push(format!("<@&{}>", os_role_id));
        if covering.is_empty() {
            lines.push("> :warning:".to_string());
        } else {
            lines.push(format!(
                "> :white_check_mark: (covered by {} member{})",
                covering.len(),
                plural(covering.len())
            ));
            lines.push(format!("> {}", mentions(covering)));
        }
    }

    lines.join("\n")
}
