//! Per-user application override domain model.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

/// A self-registered application ID treated as tracked for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserApp {
    /// Discord user ID.
    pub user_id: u64,
    /// Application ID the user registered.
    pub app_id: String,
    /// Last time the override was registered or matched (rate-limited).
    pub timestamp: DateTime<Utc>,
}

impl UserApp {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(UserApp)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - Failed to parse user_id as u64
    pub fn from_entity(entity: entity::user_app::Model) -> Result<Self, DbErr> {
        let user_id = entity
            .user_id
            .parse::<u64>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse user_id: {}", e)))?;

        Ok(Self {
            user_id,
            app_id: entity.app_id,
            timestamp: entity.timestamp,
        })
    }
}
