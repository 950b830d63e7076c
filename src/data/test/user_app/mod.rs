use crate::data::user_app::UserAppRepository;
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod replace;
mod update_timestamp;
