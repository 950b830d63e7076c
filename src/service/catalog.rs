//! Known-application registry backed by the external players catalog.
//!
//! The registry is the set of application IDs that count as "listening to a tracked
//! companion application". It lives in memory for lookups on every presence event and
//! is persisted so a restart serves the last good set until the next refresh succeeds.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    data::known_app::KnownAppRepository,
    error::{catalog::CatalogError, AppError},
};

/// First-party application IDs that are always known, catalog or not.
pub const FIRST_PARTY_APP_IDS: [&str; 2] = ["1205619376275980288", "1292142821482172506"];

/// Shared, cheaply cloneable set of known application IDs.
#[derive(Clone)]
pub struct KnownAppRegistry {
    apps: Arc<RwLock<HashSet<String>>>,
}

impl Default for KnownAppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KnownAppRegistry {
    /// Creates a registry containing only the first-party application IDs.
    pub fn new() -> Self {
        Self::with_apps(std::iter::empty::<String>())
    }

    /// Creates a registry from the given IDs plus the first-party ones.
    pub fn with_apps<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps: Arc::new(RwLock::new(with_first_party(
                apps.into_iter().map(Into::into).collect(),
            ))),
        }
    }

    pub fn contains(&self, app_id: &str) -> bool {
        self.apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(app_id)
    }

    pub fn len(&self) -> usize {
        self.apps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swaps in a new set. Readers see either the old or the new set as a whole.
    fn replace(&self, apps: HashSet<String>) {
        *self.apps.write().unwrap_or_else(PoisonError::into_inner) = apps;
    }

    /// Loads the persisted set from the previous run.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of known application IDs after loading
    /// - `Err(AppError::DbErr)` - Database error; the in-memory set is unchanged
    pub async fn load(&self, db: &DatabaseConnection) -> Result<usize, AppError> {
        let stored = KnownAppRepository::new(db).get_all().await?;
        let apps = with_first_party(stored);
        let count = apps.len();

        self.replace(apps);

        Ok(count)
    }

    /// Fetches the players catalog and replaces the known set with its application IDs.
    ///
    /// The new set is persisted before it is swapped in, so a failure at any step leaves
    /// both the stored and the in-memory set untouched.
    ///
    /// # Arguments
    /// - `db` - Database connection for persisting the new set
    /// - `http_client` - HTTP client with a bounded timeout
    /// - `url` - Players catalog URL
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of known application IDs after the refresh
    /// - `Err(AppError::ReqwestErr)` - Request failed or timed out
    /// - `Err(AppError::CatalogErr)` - Non-success status or undecodable document
    /// - `Err(AppError::DbErr)` - Failed to persist the new set
    pub async fn refresh(
        &self,
        db: &DatabaseConnection,
        http_client: &reqwest::Client,
        url: &str,
    ) -> Result<usize, AppError> {
        let response = http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        let apps = with_first_party(parse_players(&body)?);
        let count = apps.len();

        KnownAppRepository::new(db).replace_all(&apps).await?;
        self.replace(apps);

        tracing::info!("Updated application IDs ({} entries)", count);

        Ok(count)
    }
}

fn with_first_party(mut apps: HashSet<String>) -> HashSet<String> {
    apps.extend(FIRST_PARTY_APP_IDS.iter().map(|id| id.to_string()));
    apps
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlayersDocument {
    Wrapped { players: Vec<Value> },
    Bare(Vec<Value>),
}

/// Extracts the companion application IDs from a players catalog document.
///
/// Accepts both `{"players": [...]}` and a bare list. Each player carries its ID at
/// `extra.discord_application_id`, as a string or a number; players without one are
/// logged and skipped.
pub fn parse_players(json: &str) -> Result<HashSet<String>, CatalogError> {
    let players = match serde_json::from_str::<PlayersDocument>(json)? {
        PlayersDocument::Wrapped { players } => players,
        PlayersDocument::Bare(players) => players,
    };

    let mut apps = HashSet::new();
    for player in &players {
        match application_id(player) {
            Some(app_id) => {
                apps.insert(app_id);
            }
            None => {
                let name = player
                    .get("id")
                    .or_else(|| player.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("<unnamed>");
                tracing::warn!("Player {} does not have a discord app id", name);
            }
        }
    }

    Ok(apps)
}

fn application_id(player: &Value) -> Option<String> {
    match player.get("extra")?.get("discord_application_id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => id.as_u64().map(|id| id.to_string()),
        _ => None,
    }
}
