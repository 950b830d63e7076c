use crate::{
    data::{listener_role::ListenerRoleRepository, user_app::UserAppRepository},
    error::AppError,
    model::activity::PresenceStatus,
    service::{catalog::KnownAppRegistry, lock::GuildLocks},
};
use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory};

use gateway::{idle_member, listening, listening_member, FakeGateway, RoleCall};

pub(crate) mod gateway;

mod reconcile;
mod scenario;

const GUILD: u64 = 1;
const FOR_ROLE: u64 = 10;
const LISTENER_ROLE: u64 = 20;
const USER: u64 = 42;
