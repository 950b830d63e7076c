//! Factory for creating user application override test data.

use chrono::{DateTime, Utc};
use entity::user_app;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::fixture;

/// Factory for building user app entities with custom values.
///
/// Default values are sourced from the user_app fixture.
///
/// # Example
///
/// ```rust,ignore
/// let user_app = UserAppFactory::new(&db, 42)
///     .app_id("777")
///     .timestamp(Utc::now() - chrono::Duration::days(31))
///     .build()
///     .await?;
/// ```
pub struct UserAppFactory<'a> {
    db: &'a DatabaseConnection,
    entity: user_app::Model,
}

impl<'a> UserAppFactory<'a> {
    /// Creates a new factory for the given user with fixture defaults.
    pub fn new(db: &'a DatabaseConnection, user_id: u64) -> Self {
        let entity = fixture::user_app::entity_builder()
            .user_id(user_id.to_string())
            .build();

        Self { db, entity }
    }

    /// Sets the application ID.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.entity.app_id = app_id.into();
        self
    }

    /// Sets the retention timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.entity.timestamp = timestamp;
        self
    }

    /// Builds and inserts the user app entity.
    pub async fn build(self) -> Result<user_app::Model, DbErr> {
        user_app::ActiveModel {
            user_id: ActiveValue::Set(self.entity.user_id),
            app_id: ActiveValue::Set(self.entity.app_id),
            timestamp: ActiveValue::Set(self.entity.timestamp),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user app override with the given application ID and timestamp.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - Discord user ID
/// - `app_id` - Application ID of the override
/// - `timestamp` - Retention timestamp
pub async fn create_user_app(
    db: &DatabaseConnection,
    user_id: u64,
    app_id: &str,
    timestamp: DateTime<Utc>,
) -> Result<user_app::Model, DbErr> {
    UserAppFactory::new(db, user_id)
        .app_id(app_id)
        .timestamp(timestamp)
        .build()
        .await
}
