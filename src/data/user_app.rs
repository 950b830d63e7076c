//! Repository for per-user application overrides.
//!
//! The table is keyed by user, but writes still clear any existing row for the user
//! before inserting so a user never ends up with more than one live override.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, TransactionTrait,
};

use crate::model::user_app::UserApp;

pub struct UserAppRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserAppRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_user(&self, user_id: u64) -> Result<Option<UserApp>, DbErr> {
        entity::prelude::UserApp::find_by_id(user_id.to_string())
            .one(self.db)
            .await?
            .map(UserApp::from_entity)
            .transpose()
    }

    /// Clears the user's override and writes a new one in a single transaction.
    ///
    /// # Arguments
    /// - `user_id` - Discord user ID
    /// - `app_id` - Application ID to register
    /// - `timestamp` - Registration time
    ///
    /// # Returns
    /// - `Ok(UserApp)` - The newly stored override
    /// - `Err(DbErr)` - Database error; the previous override is kept
    pub async fn replace(
        &self,
        user_id: u64,
        app_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<UserApp, DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::UserApp::delete_many()
            .filter(entity::user_app::Column::UserId.eq(user_id.to_string()))
            .exec(&txn)
            .await?;

        entity::prelude::UserApp::insert(entity::user_app::ActiveModel {
            user_id: ActiveValue::Set(user_id.to_string()),
            app_id: ActiveValue::Set(app_id.to_string()),
            timestamp: ActiveValue::Set(timestamp),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;

        Ok(UserApp {
            user_id,
            app_id: app_id.to_string(),
            timestamp,
        })
    }

    /// Sets the retention timestamp of the user's override, if it still names `app_id`.
    ///
    /// # Returns
    /// - `Ok(true)` - Timestamp updated
    /// - `Ok(false)` - No matching override
    pub async fn update_timestamp(
        &self,
        user_id: u64,
        app_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::UserApp::update_many()
            .col_expr(
                entity::user_app::Column::Timestamp,
                sea_orm::sea_query::Expr::value(timestamp),
            )
            .filter(entity::user_app::Column::UserId.eq(user_id.to_string()))
            .filter(entity::user_app::Column::AppId.eq(app_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Removes the user's override.
    ///
    /// # Returns
    /// - `Ok(true)` - An override existed and was removed
    /// - `Ok(false)` - The user had no override
    pub async fn delete_by_user(&self, user_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::UserApp::delete_many()
            .filter(entity::user_app::Column::UserId.eq(user_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Removes `user_app` unless it was replaced or bumped since it was read.
    ///
    /// # Returns
    /// - `Ok(true)` - The override was removed
    /// - `Ok(false)` - The user now holds a different or newer override, which is kept
    pub async fn delete_unchanged(&self, user_app: &UserApp) -> Result<bool, DbErr> {
        let result = entity::prelude::UserApp::delete_many()
            .filter(entity::user_app::Column::UserId.eq(user_app.user_id.to_string()))
            .filter(entity::user_app::Column::AppId.eq(user_app.app_id.as_str()))
            .filter(entity::user_app::Column::Timestamp.lte(user_app.timestamp))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_all(&self) -> Result<Vec<UserApp>, DbErr> {
        entity::prelude::UserApp::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(UserApp::from_entity)
            .collect()
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::UserApp::find().count(self.db).await
    }
}
