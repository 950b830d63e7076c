//! Factory for canned support replies.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for building macro entities with custom values.
///
/// Defaults:
/// - title: `"Macro {id}"`
/// - description: `"Description {id}"`
/// - creator: `"{id}"`
/// - image and colour unset
pub struct MacroFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    title: String,
    description: String,
    creator: String,
    image_url: Option<String>,
    embed_color: Option<String>,
}

impl<'a> MacroFactory<'a> {
    /// Creates a new factory for a macro with the given name.
    pub fn new(db: &'a DatabaseConnection, name: impl Into<String>) -> Self {
        let id = next_id();
        Self {
            db,
            name: name.into(),
            title: format!("Macro {}", id),
            description: format!("Description {}", id),
            creator: id.to_string(),
            image_url: None,
            embed_color: None,
        }
    }

    /// Sets the embed title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the embed colour.
    pub fn embed_color(mut self, embed_color: Option<String>) -> Self {
        self.embed_color = embed_color;
        self
    }

    /// Builds and inserts the macro entity.
    pub async fn build(self) -> Result<entity::macro_entry::Model, DbErr> {
        let now = Utc::now();
        entity::macro_entry::ActiveModel {
            name: ActiveValue::Set(self.name),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(self.description),
            creator: ActiveValue::Set(self.creator),
            date_created: ActiveValue::Set(now),
            date_edited: ActiveValue::Set(now),
            image_url: ActiveValue::Set(self.image_url),
            embed_color: ActiveValue::Set(self.embed_color),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a macro with default values.
pub async fn create_macro(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entity::macro_entry::Model, DbErr> {
    MacroFactory::new(db, name).build().await
}
