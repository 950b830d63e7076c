use std::str::FromStr;
use std::time::Duration;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATABASE_URL: &str = "sqlite://listenerbot.db?mode=rwc";
const DEFAULT_PLAYERS_JSON_URL: &str = "https://live.musicpresence.app/v3/players.min.json";
const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/ungive/discord-music-presence/releases?per_page=1";

const DEFAULT_REFRESH_INTERVAL_HOURS: u64 = 8;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BULK_MUTATION_CONCURRENCY: usize = 1;

pub struct Config {
    pub discord_bot_token: String,
    pub database_url: String,

    pub players_json_url: String,
    pub releases_url: String,

    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub bulk_mutation_concurrency: usize,

    /// Legacy JSON settings document imported once into an empty database.
    pub legacy_settings_path: Option<String>,

    pub beta_tester_role_id: Option<u64>,
    pub os_role_ids: Vec<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            players_json_url: var_or("PLAYERS_JSON_URL", DEFAULT_PLAYERS_JSON_URL),
            releases_url: var_or("RELEASES_URL", DEFAULT_RELEASES_URL),
            refresh_interval: Duration::from_secs(
                parse_var("REFRESH_INTERVAL_HOURS")?.unwrap_or(DEFAULT_REFRESH_INTERVAL_HOURS)
                    * 60
                    * 60,
            ),
            http_timeout: Duration::from_secs(
                parse_var("HTTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            bulk_mutation_concurrency: parse_var("BULK_MUTATION_CONCURRENCY")?
                .unwrap_or(DEFAULT_BULK_MUTATION_CONCURRENCY)
                .max(1),
            legacy_settings_path: std::env::var("LEGACY_SETTINGS_PATH").ok(),
            beta_tester_role_id: parse_var("BETA_TESTER_ROLE_ID")?,
            os_role_ids: parse_id_list("OS_ROLE_IDS")?,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads and parses an optional environment variable.
fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// Reads a comma separated list of snowflake IDs.
fn parse_id_list(name: &str) -> Result<Vec<u64>, ConfigError> {
    let Ok(value) = std::env::var(name) else {
        return Ok(Vec::new());
    };

    split_ids(&value).map_err(|_| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: value.clone(),
    })
}

fn split_ids(value: &str) -> Result<Vec<u64>, std::num::ParseIntError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::parse::<u64>)
        .collect()
}
