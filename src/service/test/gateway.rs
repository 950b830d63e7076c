//! Recording in-memory role gateway.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use serenity::async_trait;

use crate::{
    error::AppError,
    model::{
        activity::{Activity, MemberSnapshot, PresenceStatus},
        listener_role::GuildRole,
    },
    service::reconcile::RoleGateway,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCall {
    Add { user_id: u64, role_id: u64 },
    Remove { user_id: u64, role_id: u64 },
}

/// Fake gateway for a single guild.
///
/// Members' held roles are updated by successful `add_role`/`remove_role` calls so
/// later guild passes observe the result, just like the real cache would.
pub struct FakeGateway {
    pub guild_id: u64,
    bot_top_position: u16,
    roles: Mutex<HashMap<u64, GuildRole>>,
    members: Mutex<Vec<MemberSnapshot>>,
    /// Roles whose mutations the platform rejects.
    rejected: Mutex<HashSet<u64>>,
    calls: Mutex<Vec<RoleCall>>,
}

impl FakeGateway {
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            bot_top_position: 10,
            roles: Mutex::new(HashMap::new()),
            members: Mutex::new(Vec::new()),
            rejected: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Adds an assignable role without permissions below the bot's top role.
    pub fn with_role(self, role_id: u64) -> Self {
        self.with_role_def(GuildRole {
            role_id,
            position: 1,
            permissions: 0,
            managed: false,
        })
    }

    pub fn with_role_def(self, role: GuildRole) -> Self {
        self.roles.lock().unwrap().insert(role.role_id, role);
        self
    }

    pub fn with_member(self, snapshot: MemberSnapshot) -> Self {
        self.members.lock().unwrap().push(snapshot);
        self
    }

    pub fn reject(&self, role_id: u64) {
        self.rejected.lock().unwrap().insert(role_id);
    }

    /// Simulates a role deleted outside the bot.
    pub fn delete_role(&self, role_id: u64) {
        self.roles.lock().unwrap().remove(&role_id);
        for member in self.members.lock().unwrap().iter_mut() {
            member.roles.retain(|id| *id != role_id);
        }
    }

    pub fn set_presence(&self, user_id: u64, status: PresenceStatus, activities: Vec<Activity>) {
        for member in self.members.lock().unwrap().iter_mut() {
            if member.user_id == user_id {
                member.status = status;
                member.activities = activities.clone();
            }
        }
    }

    /// Current snapshot of a member, reflecting every successful mutation.
    pub fn snapshot(&self, user_id: u64) -> MemberSnapshot {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.user_id == user_id)
            .cloned()
            .unwrap()
    }

    pub fn roles_of(&self, user_id: u64) -> Vec<u64> {
        self.snapshot(user_id).roles
    }

    pub fn calls(&self) -> Vec<RoleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn mutate(&self, user_id: u64, role_id: u64, add: bool) -> Result<(), AppError> {
        let call = if add {
            RoleCall::Add { user_id, role_id }
        } else {
            RoleCall::Remove { user_id, role_id }
        };
        self.calls.lock().unwrap().push(call);

        if self.rejected.lock().unwrap().contains(&role_id) {
            return Err(AppError::BadRequest("Missing Permissions".to_string()));
        }

        let mut members = self.members.lock().unwrap();
        if let Some(member) = members.iter_mut().find(|m| m.user_id == user_id) {
            if add {
                if !member.roles.contains(&role_id) {
                    member.roles.push(role_id);
                }
            } else {
                member.roles.retain(|id| *id != role_id);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl RoleGateway for FakeGateway {
    fn guild_ids(&self) -> Vec<u64> {
        vec![self.guild_id]
    }

    async fn guild_members(&self, guild_id: u64) -> Result<Vec<MemberSnapshot>, AppError> {
        if guild_id != self.guild_id {
            return Ok(Vec::new());
        }
        Ok(self.members.lock().unwrap().clone())
    }

    async fn member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<MemberSnapshot>, AppError> {
        if guild_id != self.guild_id {
            return Ok(None);
        }
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.user_id == user_id)
            .cloned())
    }

    async fn resolve_role(
        &self,
        _guild_id: u64,
        role_id: u64,
    ) -> Result<Option<GuildRole>, AppError> {
        Ok(self.roles.lock().unwrap().get(&role_id).cloned())
    }

    async fn bot_top_position(&self, _guild_id: u64) -> Result<u16, AppError> {
        Ok(self.bot_top_position)
    }

    async fn add_role(&self, _guild_id: u64, user_id: u64, role_id: u64) -> Result<(), AppError> {
        self.mutate(user_id, role_id, true)
    }

    async fn remove_role(
        &self,
        _guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), AppError> {
        self.mutate(user_id, role_id, false)
    }
}

/// Member of `guild_id` that is online and not doing anything.
pub fn idle_member(guild_id: u64, user_id: u64, roles: Vec<u64>) -> MemberSnapshot {
    MemberSnapshot {
        guild_id,
        user_id,
        status: PresenceStatus::Online,
        activities: Vec::new(),
        roles,
    }
}

/// Member of `guild_id` that is online and listening through `app_id`.
pub fn listening_member(guild_id: u64, user_id: u64, app_id: &str, roles: Vec<u64>) -> MemberSnapshot {
    MemberSnapshot {
        activities: vec![listening(app_id)],
        ..idle_member(guild_id, user_id, roles)
    }
}

pub fn listening(app_id: &str) -> Activity {
    Activity::Listening {
        application_id: Some(app_id.to_string()),
    }
}
