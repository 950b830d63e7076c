//! Macros: named, reusable support replies.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    data::macro_entry::MacroRepository,
    error::AppError,
    model::macro_entry::{parse_hex_color, Macro, MacroParam},
};

/// In-memory list of macro names used for autocomplete.
#[derive(Clone, Default)]
pub struct MacroNameCache {
    names: Arc<RwLock<Vec<String>>>,
}

impl MacroNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names containing `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();

        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn set(&self, names: Vec<String>) {
        *self.names.write().unwrap_or_else(PoisonError::into_inner) = names;
    }
}

pub struct MacroService<'a> {
    db: &'a DatabaseConnection,
    cache: &'a MacroNameCache,
}

impl<'a> MacroService<'a> {
    pub fn new(db: &'a DatabaseConnection, cache: &'a MacroNameCache) -> Self {
        Self { db, cache }
    }

    /// Reloads the autocomplete name list from the database.
    pub async fn refresh_cache(&self) -> Result<(), AppError> {
        let names = MacroRepository::new(self.db)
            .get_all()
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();
        self.cache.set(names);

        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<Macro, AppError> {
        MacroRepository::new(self.db)
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("There is no macro named `{}`", name)))
    }

    /// Creates a macro.
    ///
    /// # Returns
    /// - `Ok(Macro)` - Created macro
    /// - `Err(AppError::BadRequest)` - Name taken or invalid colour
    pub async fn create(&self, param: MacroParam, creator: u64) -> Result<Macro, AppError> {
        validate(&param)?;
        let repo = MacroRepository::new(self.db);

        if repo.find_by_name(&param.name).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "A macro named `{}` already exists",
                param.name
            )));
        }

        let created = repo.create(param, creator, Utc::now()).await?;
        self.refresh_cache().await?;

        tracing::info!("Macro {} created by {}", created.name, creator);

        Ok(created)
    }

    pub async fn edit(&self, param: MacroParam) -> Result<Macro, AppError> {
        validate(&param)?;
        let name = param.name.clone();

        let updated = MacroRepository::new(self.db)
            .update(param, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("There is no macro named `{}`", name)))?;
        self.refresh_cache().await?;

        Ok(updated)
    }

    pub async fn delete(&self, name: &str) -> Result<(), AppError> {
        if !MacroRepository::new(self.db).delete(name).await? {
            return Err(AppError::NotFound(format!(
                "There is no macro named `{}`",
                name
            )));
        }
        self.refresh_cache().await?;

        Ok(())
    }

    /// All macros, most recently edited first.
    pub async fn list(&self) -> Result<Vec<Macro>, AppError> {
        Ok(MacroRepository::new(self.db).get_all().await?)
    }
}

fn validate(param: &MacroParam) -> Result<(), AppError> {
    if let Some(color) = &param.embed_color {
        if parse_hex_color(color).is_none() {
            return Err(AppError::BadRequest(format!(
                "`{}` is not a colour, use the `#RRGGBB` format",
                color
            )));
        }
    }

    if let Some(image_url) = &param.image_url {
        let valid = url::Url::parse(image_url)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            return Err(AppError::BadRequest(format!(
                "`{}` is not a valid image URL",
                image_url
            )));
        }
    }

    Ok(())
}

/// Renders the macro list, one line per macro.
pub fn format_macro_list(macros: &[Macro]) -> String {
    if macros.is_empty() {
        return "No macros created yet".to_string();
    }

    macros
        .iter()
        .map(|m| format!("- `{}`: {} (<t:{}:R>)", m.name, m.title, m.date_edited.timestamp()))
        .collect::<Vec<_>>()
        .join("\n")
}
