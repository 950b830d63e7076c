//! One-time import of the legacy JSON settings document.
//!
//! The legacy document is a flat JSON object of named tables. IDs appear both as strings
//! and as numbers, and sponsor platforms were first stored as a bare emoji string before
//! gaining an optional URL. All of that is normalized here, at decode time, so nothing
//! past this module ever sees the legacy shapes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, TransactionTrait,
};
use serde::Deserialize;

use crate::model::sponsor::SponsorPlatform;

/// Snowflake stored either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyId {
    Number(u64),
    Text(String),
}

impl LegacyId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(id) => id.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyUserApp {
    pub app_id: String,
    pub user_id: LegacyId,
    /// Unix seconds, sometimes fractional.
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacySponsorRoles {
    pub monthly: Option<LegacyId>,
    pub normal: Option<LegacyId>,
}

/// Platform entry in either of its stored shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyPlatform {
    Structured { emoji: String, url: Option<String> },
    Bare(String),
}

impl LegacyPlatform {
    pub fn into_platform(self, name: String) -> SponsorPlatform {
        match self {
            Self::Structured { emoji, url } => SponsorPlatform { name, emoji, url },
            Self::Bare(emoji) => SponsorPlatform {
                name,
                emoji,
                url: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacySettings {
    #[serde(default)]
    pub apps: BTreeMap<String, serde_json::Value>,
    /// user -> app -> record
    #[serde(default)]
    pub user_apps: BTreeMap<String, BTreeMap<String, LegacyUserApp>>,
    /// guild -> for role -> listener role
    #[serde(default)]
    pub roles: BTreeMap<String, BTreeMap<String, LegacyId>>,
    /// `"guild:channel"` entries
    #[serde(default)]
    pub autolog: Vec<String>,
    #[serde(default)]
    pub sponsor_roles: BTreeMap<String, LegacySponsorRoles>,
    #[serde(default)]
    pub sponsor_platforms: BTreeMap<String, BTreeMap<String, LegacyPlatform>>,
    /// guild -> role -> platform name
    #[serde(default)]
    pub sponsor_platform_roles: BTreeMap<String, BTreeMap<String, String>>,
}

impl LegacySettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Newest override per user; entries with unparseable IDs or timestamps are dropped.
    pub fn newest_user_apps(&self) -> Vec<(u64, String, DateTime<Utc>)> {
        self.user_apps
            .iter()
            .filter_map(|(user_id, apps)| {
                let user_id = user_id.parse::<u64>().ok()?;
                let newest = apps.values().max_by(|a, b| a.timestamp.total_cmp(&b.timestamp))?;
                let timestamp = DateTime::from_timestamp(newest.timestamp as i64, 0)?;
                Some((user_id, newest.app_id.clone(), timestamp))
            })
            .collect()
    }

    /// Observed channels as `(guild_id, channel_id)` pairs.
    pub fn autolog_channels(&self) -> BTreeSet<(u64, u64)> {
        self.autolog
            .iter()
            .filter_map(|entry| {
                let (guild_id, channel_id) = entry.split_once(':')?;
                Some((guild_id.parse().ok()?, channel_id.parse().ok()?))
            })
            .collect()
    }
}

/// Row counts written by an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub known_apps: usize,
    pub user_apps: usize,
    pub listener_roles: usize,
    pub autolog_channels: usize,
    pub sponsor_guilds: usize,
}

pub struct LegacyImportRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LegacyImportRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the database holds no listener roles and no overrides yet.
    pub async fn is_empty(&self) -> Result<bool, DbErr> {
        let roles = entity::prelude::ListenerRole::find().count(self.db).await?;
        let user_apps = entity::prelude::UserApp::find().count(self.db).await?;

        Ok(roles == 0 && user_apps == 0)
    }

    /// Writes the decoded legacy settings in a single transaction.
    ///
    /// # Arguments
    /// - `settings` - Decoded legacy document
    ///
    /// # Returns
    /// - `Ok(ImportSummary)` - Number of rows written per table
    /// - `Err(DbErr)` - Database error; nothing is written
    pub async fn import(&self, settings: &LegacySettings) -> Result<ImportSummary, DbErr> {
        let mut summary = ImportSummary::default();
        let txn = self.db.begin().await?;

        let known_apps: Vec<_> = settings
            .apps
            .keys()
            .map(|app_id| entity::known_app::ActiveModel {
                app_id: ActiveValue::Set(app_id.clone()),
            })
            .collect();
        summary.known_apps = known_apps.len();
        if !known_apps.is_empty() {
            entity::prelude::KnownApp::insert_many(known_apps)
                .exec_without_returning(&txn)
                .await?;
        }

        let user_apps: Vec<_> = settings
            .newest_user_apps()
            .into_iter()
            .map(|(user_id, app_id, timestamp)| entity::user_app::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                app_id: ActiveValue::Set(app_id),
                timestamp: ActiveValue::Set(timestamp),
            })
            .collect();
        summary.user_apps = user_apps.len();
        if !user_apps.is_empty() {
            entity::prelude::UserApp::insert_many(user_apps)
                .exec_without_returning(&txn)
                .await?;
        }

        let mut listener_roles = Vec::new();
        for (guild_id, mapping) in &settings.roles {
            for (for_role_id, listener_role_id) in mapping {
                let Some(listener_role_id) = listener_role_id.as_u64() else {
                    tracing::warn!(
                        "Skipping legacy listener role for role {} in guild {}: invalid ID",
                        for_role_id,
                        guild_id
                    );
                    continue;
                };
                listener_roles.push(entity::listener_role::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id.clone()),
                    for_role_id: ActiveValue::Set(for_role_id.clone()),
                    listener_role_id: ActiveValue::Set(listener_role_id.to_string()),
                    ..Default::default()
                });
            }
        }
        summary.listener_roles = listener_roles.len();
        if !listener_roles.is_empty() {
            entity::prelude::ListenerRole::insert_many(listener_roles)
                .exec_without_returning(&txn)
                .await?;
        }

        let autolog_channels: Vec<_> = settings
            .autolog_channels()
            .into_iter()
            .map(|(guild_id, channel_id)| entity::autolog_channel::ActiveModel {
                guild_id: ActiveValue::Set(guild_id.to_string()),
                channel_id: ActiveValue::Set(channel_id.to_string()),
                ..Default::default()
            })
            .collect();
        summary.autolog_channels = autolog_channels.len();
        if !autolog_channels.is_empty() {
            entity::prelude::AutologChannel::insert_many(autolog_channels)
                .exec_without_returning(&txn)
                .await?;
        }

        for (guild_id, roles) in &settings.sponsor_roles {
            entity::prelude::SponsorRole::insert(entity::sponsor_role::ActiveModel {
                guild_id: ActiveValue::Set(guild_id.clone()),
                monthly_role_id: ActiveValue::Set(
                    roles.monthly.as_ref().and_then(LegacyId::as_u64).map(|id| id.to_string()),
                ),
                one_time_role_id: ActiveValue::Set(
                    roles.normal.as_ref().and_then(LegacyId::as_u64).map(|id| id.to_string()),
                ),
            })
            .exec_without_returning(&txn)
            .await?;
            summary.sponsor_guilds += 1;
        }

        for (guild_id, platforms) in &settings.sponsor_platforms {
            for (name, platform) in platforms {
                let platform = platform.clone().into_platform(name.clone());
                entity::prelude::SponsorPlatform::insert(entity::sponsor_platform::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id.clone()),
                    name: ActiveValue::Set(platform.name),
                    emoji: ActiveValue::Set(platform.emoji),
                    url: ActiveValue::Set(platform.url),
                    ..Default::default()
                })
                .exec_without_returning(&txn)
                .await?;
            }
        }

        for (guild_id, roles) in &settings.sponsor_platform_roles {
            for (role_id, platform) in roles {
                entity::prelude::SponsorPlatformRole::insert(
                    entity::sponsor_platform_role::ActiveModel {
                        role_id: ActiveValue::Set(role_id.clone()),
                        guild_id: ActiveValue::Set(guild_id.clone()),
                        platform: ActiveValue::Set(platform.clone()),
                    },
                )
                .exec_without_returning(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        Ok(summary)
    }
}
