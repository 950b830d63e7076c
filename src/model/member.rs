//! Guild member data used by the member utilities, sponsors and giveaways.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub user_id: u64,
    pub bot: bool,
    /// Unknown for members the gateway delivered without a join time.
    pub joined_at: Option<DateTime<Utc>>,
    pub roles: Vec<u64>,
}

impl GuildMember {
    pub fn holds(&self, role_id: u64) -> bool {
        self.roles.contains(&role_id)
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}
