//! Fixture for user application override test data.

use chrono::{DateTime, Utc};
use entity::user_app;

/// Default test user Discord ID.
pub const DEFAULT_USER_ID: &str = "123456789";

/// Default test application ID, absent from any catalog.
pub const DEFAULT_APP_ID: &str = "777";

/// Creates a user app entity model with default values and the current time.
///
/// # Example
/// ```rust,ignore
/// let entity = fixture::user_app::entity();
/// assert_eq!(entity.app_id, "777");
/// ```
pub fn entity() -> user_app::Model {
    entity_builder().build()
}

/// Creates a customizable user app entity builder.
pub fn entity_builder() -> UserAppEntityBuilder {
    UserAppEntityBuilder::default()
}

/// Builder for user app entity models.
pub struct UserAppEntityBuilder {
    user_id: String,
    app_id: String,
    timestamp: DateTime<Utc>,
}

impl Default for UserAppEntityBuilder {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl UserAppEntityBuilder {
    /// Sets the user ID.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the application ID.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Sets the retention timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builds the entity model without touching the database.
    pub fn build(self) -> user_app::Model {
        user_app::Model {
            user_id: self.user_id,
            app_id: self.app_id,
            timestamp: self.timestamp,
        }
    }
}
