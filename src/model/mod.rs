//! Domain models shared by the service, data and bot layers.
//!
//! Entity models are converted into these types at the repository boundary and
//! Serenity objects are converted into them by the bot adapter, so the service
//! layer never depends on database or gateway structures directly.

pub mod activity;
pub mod listener_role;
pub mod macro_entry;
pub mod member;
pub mod sponsor;
pub mod support;
pub mod user_app;
