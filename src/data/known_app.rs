//! Repository for the persisted set of known companion application IDs.

use sea_orm::{
    ActiveValue, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, TransactionTrait,
};
use std::collections::HashSet;

pub struct KnownAppRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> KnownAppRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every known application ID.
    pub async fn get_all(&self) -> Result<HashSet<String>, DbErr> {
        let entities = entity::prelude::KnownApp::find().all(self.db).await?;

        Ok(entities.into_iter().map(|e| e.app_id).collect())
    }

    /// Replaces the whole set in a single transaction.
    ///
    /// Readers either see the previous set or the new one, never a mix.
    ///
    /// # Arguments
    /// - `app_ids` - The complete new set of application IDs
    ///
    /// # Returns
    /// - `Ok(())` - Set replaced
    /// - `Err(DbErr)` - Database error; the transaction is rolled back and the previous
    ///   set stays in place
    pub async fn replace_all(&self, app_ids: &HashSet<String>) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::KnownApp::delete_many().exec(&txn).await?;

        if !app_ids.is_empty() {
            let models = app_ids
                .iter()
                .map(|app_id| entity::known_app::ActiveModel {
                    app_id: ActiveValue::Set(app_id.clone()),
                });

            entity::prelude::KnownApp::insert_many(models)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::KnownApp::find().count(self.db).await
    }
}
