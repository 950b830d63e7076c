//! Discord bot integration: gateway events, slash commands and the role gateway.
//!
//! Event handlers turn gateway events into calls to the service layer; the
//! `SerenityRoleGateway` adapter converts Serenity models into domain models and
//! performs role mutations over HTTP. Everything else in the crate is unaware of
//! Serenity.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild availability, roles and the guild cache
//! - `GUILD_MEMBERS` - Member lists and role changes (privileged intent)
//! - `GUILD_PRESENCES` - Status and activity updates (privileged intent)
//! - `GUILD_MESSAGES` and `MESSAGE_CONTENT` - Log request detection (privileged intent)
//!
//! Privileged intents must be explicitly enabled in the Discord Developer Portal for
//! the bot application.

pub mod command;
pub mod gateway;
pub mod handler;
pub mod start;
