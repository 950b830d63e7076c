//! Test fixtures providing reusable test data without database insertion.
//!
//! Unlike factories, fixtures do NOT insert data into the database. Use them for
//! unit tests of pure logic and as default values for factory builders.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! let user_app = fixture::user_app::entity();
//!
//! let custom = fixture::user_app::entity_builder()
//!     .app_id("777")
//!     .build();
//! ```

pub mod listener_role;
pub mod user_app;
