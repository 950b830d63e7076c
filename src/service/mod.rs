//! Service layer for business logic and orchestration.
//!
//! Services sit between the bot layer (event handlers and slash commands) and the data
//! layer (repositories). They implement the presence-to-role reconciliation engine and
//! the smaller support features around it, working with domain models only. Everything
//! that talks to Discord goes through the `RoleGateway` trait or receives plain domain
//! data from the caller, so services are testable without a gateway connection.

pub mod autolog;
pub mod catalog;
pub mod giveaway;
pub mod help;
pub mod listener_role;
pub mod lock;
pub mod macros;
pub mod member;
pub mod overrides;
pub mod presence;
pub mod reconcile;
pub mod release;
pub mod sponsor;

#[cfg(test)]
pub(crate) mod test;
