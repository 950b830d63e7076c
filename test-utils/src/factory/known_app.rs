//! Factory for catalog application IDs.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts a known application ID.
///
/// # Arguments
/// - `db` - Database connection
/// - `app_id` - Application ID to mark as known
///
/// # Returns
/// - `Ok(entity::known_app::Model)` - Created entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_known_app(
    db: &DatabaseConnection,
    app_id: &str,
) -> Result<entity::known_app::Model, DbErr> {
    entity::known_app::ActiveModel {
        app_id: ActiveValue::Set(app_id.to_string()),
    }
    .insert(db)
    .await
}
