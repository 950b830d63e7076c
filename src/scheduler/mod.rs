//! Periodic background jobs.

pub mod refresh;
