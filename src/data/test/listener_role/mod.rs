use crate::data::listener_role::ListenerRoleRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod get_by_guild;
mod upsert;
