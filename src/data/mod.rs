//! Database repository layer.
//!
//! This module contains repository structs that handle database operations for each
//! logical table of the bot. Repositories use SeaORM entity models internally and
//! return domain models, so the service layer never sees entity structures.

pub mod autolog;
pub mod known_app;
pub mod legacy;
pub mod listener_role;
pub mod macro_entry;
pub mod sponsor;
pub mod user_app;

#[cfg(test)]
mod test;
