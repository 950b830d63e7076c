//! SeaORM entities for the listener bot database.
//!
//! One module per table. Discord snowflakes are stored as strings and parsed
//! into `u64` at the repository boundary.

pub mod prelude;

pub mod autolog_channel;
pub mod known_app;
pub mod listener_role;
pub mod macro_entry;
pub mod sponsor_platform;
pub mod sponsor_platform_role;
pub mod sponsor_role;
pub mod user_app;
