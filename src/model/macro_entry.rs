//! Macro (canned support reply) domain model.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

/// Embed colour used when a macro does not set one.
pub const DEFAULT_EMBED_COLOR: &str = "#34353B";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    /// Unique name used to invoke the macro.
    pub name: String,
    pub title: String,
    pub description: String,
    /// Discord user ID of the creator.
    pub creator: u64,
    pub date_created: DateTime<Utc>,
    pub date_edited: DateTime<Utc>,
    pub image_url: Option<String>,
    /// Hex colour starting with `#`.
    pub embed_color: Option<String>,
}

impl Macro {
    /// Converts an entity model to a domain model at the repository boundary.
    pub fn from_entity(entity: entity::macro_entry::Model) -> Result<Self, DbErr> {
        let creator = entity
            .creator
            .parse::<u64>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse creator: {}", e)))?;

        Ok(Self {
            name: entity.name,
            title: entity.title,
            description: entity.description,
            creator,
            date_created: entity.date_created,
            date_edited: entity.date_edited,
            image_url: entity.image_url,
            embed_color: entity.embed_color,
        })
    }

    /// Returns the embed colour as an RGB value, falling back to the default colour.
    pub fn color_value(&self) -> u32 {
        self.embed_color
            .as_deref()
            .and_then(parse_hex_color)
            .or_else(|| parse_hex_color(DEFAULT_EMBED_COLOR))
            .unwrap_or_default()
    }
}

/// Parameters for creating or editing a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroParam {
    pub name: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub embed_color: Option<String>,
}

/// Parses a `#RRGGBB` colour.
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#34353B"), Some(0x34353B));
        assert_eq!(parse_hex_color("34353B"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }
}
