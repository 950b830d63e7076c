//! Listener Bot Test Utils
//!
//! Provides shared testing utilities for building unit tests for the listener bot. This crate
//! offers a builder pattern for creating test contexts with in-memory SQLite databases and
//! customizable table schemas, plus factories for the bot's tables and Serenity objects.
//!
//! # Overview
//!
//! The test utilities consist of these main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory / fixture**: Test data with and without database insertion
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::ListenerRole;
//!
//! #[tokio::test]
//! async fn test_listener_roles() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(ListenerRole)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod serenity;
