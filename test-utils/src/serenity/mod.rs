//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity objects by deserializing JSON, simulating
//! what Discord's API would return.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::create_test_role;
//!
//! let listener = create_test_role(111111111, "Listening", 0x1DB954, 3);
//! ```
//!
//! # Available Factories
//!
//! - `role::create_test_role` - Create Serenity Role objects
//! - `role::create_test_role_with` - Create Serenity Role objects with permissions and managed flag

pub mod role;

// Re-export commonly used functions for convenience
pub use role::{create_test_role, create_test_role_with};
