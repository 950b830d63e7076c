//! Automatic replies to log file requests in observed channels.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use sea_orm::DatabaseConnection;

use crate::{data::autolog::AutologChannelRepository, error::AppError};

static LOG_REQUEST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^.*(send|share|show|need)[a-zA-Z0-9\s,]{1,16}\blogs?\b.*$",
        r"^.*(where)[a-zA-Z0-9\s,]{1,32}\blogs?\b.*$",
        r"^.*(what)[a-zA-Z0-9\s,]{1,16}\blogs?\b.*(say).*$",
    ]
    .iter()
    .map(|pattern| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("invalid log request pattern")
    })
    .collect()
});

/// Whether a message asks someone for their log files.
pub fn is_log_request(message: &str) -> bool {
    LOG_REQUEST_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(message))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutologState {
    On,
    Off,
}

pub struct AutologService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AutologService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Turns observation of a channel on or off.
    ///
    /// Turning it off without a channel clears every observed channel of the guild.
    ///
    /// # Returns
    /// - `Ok(String)` - Reply describing what changed
    /// - `Err(AppError::BadRequest)` - Turning on without a channel
    pub async fn set_state(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
        state: AutologState,
    ) -> Result<String, AppError> {
        let repo = AutologChannelRepository::new(self.db);

        let reply = match (channel_id, state) {
            (Some(channel_id), AutologState::On) => {
                if repo.add(guild_id, channel_id).await? {
                    format!("The channel <#{}> is now observed.", channel_id)
                } else {
                    format!(
                        "The channel <#{}> is already observed. Nothing to do.",
                        channel_id
                    )
                }
            }
            (Some(channel_id), AutologState::Off) => {
                if repo.remove(guild_id, channel_id).await? {
                    format!("The channel <#{}> is no longer observed.", channel_id)
                } else {
                    format!(
                        "The channel <#{}> is currently unobserved. Nothing to do.",
                        channel_id
                    )
                }
            }
            (None, AutologState::Off) => {
                repo.clear_guild(guild_id).await?;
                "All channels were removed from observation.".to_string()
            }
            (None, AutologState::On) => {
                return Err(AppError::BadRequest(
                    "Specify the channel to observe".to_string(),
                ))
            }
        };

        Ok(reply)
    }

    /// Whether a message in a channel should get the log paths as a reply.
    pub async fn should_reply(
        &self,
        guild_id: u64,
        channel_id: u64,
        content: &str,
    ) -> Result<bool, AppError> {
        if !is_log_request(content) {
            return Ok(false);
        }

        Ok(AutologChannelRepository::new(self.db)
            .exists(guild_id, channel_id)
            .await?)
    }
}
