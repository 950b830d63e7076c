//! Error types and user-facing error mapping.
//!
//! This module provides the bot's error hierarchy. The `AppError` enum serves as the
//! top-level error type that wraps domain-specific errors. Command handlers return it
//! and the interaction dispatcher turns it into a reply: configuration violations and
//! bad input are shown to the user verbatim, everything else is logged and replaced by
//! a generic message.

pub mod catalog;
pub mod config;
pub mod role;

use thiserror::Error;

use crate::error::{catalog::CatalogError, config::ConfigError, role::RoleConfigError};

/// Reply sent when a command fails for a reason the user cannot act on.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest (connection failure, timeout, ...).
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// External catalog or release lookup returned something unusable.
    #[error(transparent)]
    CatalogErr(#[from] CatalogError),

    /// Listener role configuration rejected. Shown to the user.
    #[error(transparent)]
    RoleConfigErr(#[from] RoleConfigError),

    /// Requested resource does not exist. Shown to the user.
    #[error("{0}")]
    NotFound(String),

    /// Invalid command input. Shown to the user.
    #[error("{0}")]
    BadRequest(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Returns the message to show the invoking user.
    ///
    /// Errors the user caused (bad input, rejected configuration, missing resources)
    /// are shown as-is. Anything else yields the generic unexpected-error message; the
    /// caller is responsible for logging the full error.
    pub fn user_message(&self) -> String {
        match self {
            Self::RoleConfigErr(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            _ => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether this error is an internal failure that should be logged as an error.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            Self::RoleConfigErr(_) | Self::NotFound(_) | Self::BadRequest(_)
        )
    }
}
