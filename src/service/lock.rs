//! Per-guild serialization of role mutations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// Hands out one async mutex per guild.
///
/// Every reconciliation, mapping change and teardown of a guild runs while holding the
/// guild's guard, so a presence event and the periodic pass never interleave their
/// writes. Guilds never block each other.
#[derive(Clone, Default)]
pub struct GuildLocks {
    locks: Arc<Mutex<HashMap<u64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl GuildLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and acquires the guard of `guild_id`.
    pub async fn lock(&self, guild_id: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(guild_id).or_default().clone()
        };

        lock.lock_owned().await
    }
}
