use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryOrder,
};

use crate::model::macro_entry::{Macro, MacroParam};

pub struct MacroRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MacroRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new macro.
    ///
    /// # Arguments
    /// - `param` - Name and content of the macro
    /// - `creator` - Discord user ID of the creator
    /// - `now` - Creation time, also used as the initial edit time
    ///
    /// # Returns
    /// - `Ok(Macro)` - The created macro
    /// - `Err(DbErr)` - Database error, including a duplicate name
    pub async fn create(
        &self,
        param: MacroParam,
        creator: u64,
        now: DateTime<Utc>,
    ) -> Result<Macro, DbErr> {
        let entity = entity::macro_entry::ActiveModel {
            name: ActiveValue::Set(param.name),
            title: ActiveValue::Set(param.title),
            description: ActiveValue::Set(param.description),
            creator: ActiveValue::Set(creator.to_string()),
            date_created: ActiveValue::Set(now),
            date_edited: ActiveValue::Set(now),
            image_url: ActiveValue::Set(param.image_url),
            embed_color: ActiveValue::Set(param.embed_color),
        }
        .insert(self.db)
        .await?;

        Macro::from_entity(entity)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Macro>, DbErr> {
        entity::prelude::MacroEntry::find_by_id(name.to_string())
            .one(self.db)
            .await?
            .map(Macro::from_entity)
            .transpose()
    }

    /// Replaces the content of an existing macro and bumps its edit time.
    ///
    /// # Returns
    /// - `Ok(Some(Macro))` - The updated macro
    /// - `Ok(None)` - No macro with that name
    pub async fn update(
        &self,
        param: MacroParam,
        now: DateTime<Utc>,
    ) -> Result<Option<Macro>, DbErr> {
        let Some(existing) = entity::prelude::MacroEntry::find_by_id(param.name.clone())
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.title = ActiveValue::Set(param.title);
        active.description = ActiveValue::Set(param.description);
        active.image_url = ActiveValue::Set(param.image_url);
        active.embed_color = ActiveValue::Set(param.embed_color);
        active.date_edited = ActiveValue::Set(now);

        let entity = active.update(self.db).await?;

        Macro::from_entity(entity).map(Some)
    }

    /// Deletes a macro by name.
    ///
    /// # Returns
    /// - `Ok(true)` - Macro deleted
    /// - `Ok(false)` - No macro with that name
    pub async fn delete(&self, name: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::MacroEntry::delete_by_id(name.to_string())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets all macros, most recently edited first.
    pub async fn get_all(&self) -> Result<Vec<Macro>, DbErr> {
        entity::prelude::MacroEntry::find()
            .order_by_desc(entity::macro_entry::Column::DateEdited)
            .all(self.db)
            .await?
            .into_iter()
            .map(Macro::from_entity)
            .collect()
    }

    /// Gets the names of macros containing `query`, ignoring case.
    pub async fn search_names(&self, query: &str) -> Result<Vec<String>, DbErr> {
        let needle = query.to_lowercase();

        let macros = entity::prelude::MacroEntry::find()
            .order_by_desc(entity::macro_entry::Column::DateEdited)
            .all(self.db)
            .await?;

        Ok(macros
            .into_iter()
            .map(|m| m.name)
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect())
    }
}
