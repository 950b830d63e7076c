//! User override store and its retention sweeper.
//!
//! An override is a single application ID a user registered for themselves because the
//! catalog does not know it yet. It expires after `MAX_USER_APP_ID_RETENTION_SECS` unless
//! it keeps matching, and it becomes redundant as soon as the catalog picks the ID up.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    data::user_app::UserAppRepository, error::AppError, model::user_app::UserApp,
    service::catalog::KnownAppRegistry,
};

/// Maximum age of an override before the sweeper drops it (30 days).
pub const MAX_USER_APP_ID_RETENTION_SECS: i64 = 60 * 60 * 24 * 30;

/// Minimum time between two timestamp bumps of the same override (24 hours).
pub const MIN_RETENTION_UPDATE_INTERVAL_SECS: i64 = 60 * 60 * 24;

/// Result of registering an override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The application ID is already in the registry; nothing was stored.
    AlreadyKnown,
    /// The override was stored, replacing any previous one.
    Registered(UserApp),
}

/// Whether an override last bumped at `timestamp` is due for another bump.
pub fn needs_bump(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - timestamp).num_seconds() >= MIN_RETENTION_UPDATE_INTERVAL_SECS
}

/// Whether the sweeper removes `user_app`.
///
/// True when its application ID became globally known or when it is older than the
/// maximum retention.
pub fn should_sweep(user_app: &UserApp, registry: &KnownAppRegistry, now: DateTime<Utc>) -> bool {
    registry.contains(&user_app.app_id)
        || (now - user_app.timestamp).num_seconds() > MAX_USER_APP_ID_RETENTION_SECS
}

pub struct OverrideService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OverrideService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: u64) -> Result<Option<UserApp>, AppError> {
        Ok(UserAppRepository::new(self.db).find_by_user(user_id).await?)
    }

    /// Registers `app_id` as the user's override.
    ///
    /// IDs already in the registry are never stored. Otherwise any previous override of
    /// the user is cleared first, so a user has at most one.
    ///
    /// # Arguments
    /// - `user_id` - Discord user ID
    /// - `app_id` - Application ID of the user's current listening activity
    /// - `registry` - Known application registry
    /// - `now` - Registration time
    ///
    /// # Returns
    /// - `Ok(Registration::AlreadyKnown)` - Nothing to store
    /// - `Ok(Registration::Registered(UserApp))` - Override stored
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn register(
        &self,
        user_id: u64,
        app_id: &str,
        registry: &KnownAppRegistry,
        now: DateTime<Utc>,
    ) -> Result<Registration, AppError> {
        if registry.contains(app_id) {
            return Ok(Registration::AlreadyKnown);
        }

        let user_app = UserAppRepository::new(self.db)
            .replace(user_id, app_id, now)
            .await?;

        tracing::info!("Registered app ID {} for user {}", app_id, user_id);

        Ok(Registration::Registered(user_app))
    }

    /// Moves the override's timestamp to `now`, at most once per update interval.
    ///
    /// No-op when the user's override does not name `app_id` or was bumped recently, so
    /// repeated evaluations of the same presence write at most once.
    ///
    /// # Returns
    /// - `Ok(true)` - Timestamp updated
    /// - `Ok(false)` - Nothing to do
    pub async fn bump_if_stale(
        &self,
        user_id: u64,
        app_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let repo = UserAppRepository::new(self.db);

        let Some(current) = repo.find_by_user(user_id).await? else {
            return Ok(false);
        };
        if current.app_id != app_id || !needs_bump(current.timestamp, now) {
            return Ok(false);
        }

        let updated = repo.update_timestamp(user_id, app_id, now).await?;
        if updated {
            tracing::debug!("Bumped retention of app ID {} for user {}", app_id, user_id);
        }

        Ok(updated)
    }

    /// Removes the user's override.
    ///
    /// # Returns
    /// - `Ok(true)` - An override was removed
    /// - `Ok(false)` - The user had none
    pub async fn clear(&self, user_id: u64) -> Result<bool, AppError> {
        Ok(UserAppRepository::new(self.db).delete_by_user(user_id).await?)
    }

    /// Removes every override that became known or expired.
    ///
    /// An override registered or bumped while the sweep runs is kept.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of removed overrides
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn sweep(
        &self,
        registry: &KnownAppRegistry,
        now: DateTime<Utc>,
    ) -> Result<usize, AppError> {
        let repo = UserAppRepository::new(self.db);

        let mut removed = 0;
        for user_app in repo.get_all().await? {
            if !should_sweep(&user_app, registry, now) {
                continue;
            }
            if !repo.delete_unchanged(&user_app).await? {
                continue;
            }

            let reason = if registry.contains(&user_app.app_id) {
                "known"
            } else {
                "expired"
            };
            tracing::info!(
                "Deleted {} user app ID {} for user {}",
                reason,
                user_app.app_id,
                user_app.user_id
            );
            removed += 1;
        }

        Ok(removed)
    }
}
