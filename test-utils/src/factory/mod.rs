//! Factory methods for creating test data.
//!
//! Each table has its own factory module with a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     factory::create_known_app(&db, "100").await?;
//!     factory::create_listener_role(&db, 1, 10, 20).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `known_app` - Catalog application IDs
//! - `user_app` - Per-user application overrides
//! - `listener_role` - Guild for-role to listener-role mappings
//! - `macro_entry` - Canned support replies
//! - `helpers` - Unique ID generation

pub mod helpers;
pub mod known_app;
pub mod listener_role;
pub mod macro_entry;
pub mod user_app;

pub use known_app::create_known_app;
pub use listener_role::create_listener_role;
pub use macro_entry::create_macro;
pub use user_app::create_user_app;
