//! Bot state shared by event handlers, commands and the scheduler.
//!
//! Constructed once in `main` and cloned into every consumer. All fields are cheap to
//! clone: the database connection is a pool, and the caches and limiters are `Arc`
//! backed.

use std::sync::{atomic::AtomicBool, Arc, OnceLock};

use sea_orm::DatabaseConnection;
use serenity::gateway::ShardManager;
use tokio::sync::Semaphore;
use tokio_cron_scheduler::JobScheduler;

use crate::{
    config::Config,
    service::{
        catalog::KnownAppRegistry, lock::GuildLocks, macros::MacroNameCache,
        release::ReleaseCache,
    },
};

#[derive(Clone)]
pub struct BotState {
    pub db: DatabaseConnection,

    /// HTTP client for the players catalog and release listing, with a bounded timeout.
    pub http_client: reqwest::Client,

    pub config: Arc<Config>,

    pub registry: KnownAppRegistry,
    pub releases: ReleaseCache,
    pub macro_names: MacroNameCache,

    /// Per-guild serialization of role mutations.
    pub locks: GuildLocks,

    /// Bounds in-flight role mutations of bulk commands.
    pub bulk_limiter: Arc<Semaphore>,

    /// Set once the first `cache_ready` started the refresh scheduler.
    pub scheduler_started: Arc<AtomicBool>,

    /// The running refresh scheduler.
    pub scheduler: Arc<OnceLock<JobScheduler>>,

    /// Shard manager of the running client, used by `/stop` to disconnect.
    pub shard_manager: Arc<OnceLock<Arc<ShardManager>>>,
}

impl BotState {
    /// Creates the bot state.
    ///
    /// # Arguments
    /// - `db` - Database connection with migrations applied
    /// - `http_client` - HTTP client for external lookups
    /// - `config` - Loaded configuration
    /// - `registry` - Known application registry, loaded from the database
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        config: Config,
        registry: KnownAppRegistry,
    ) -> Self {
        let releases = ReleaseCache::new(http_client.clone(), config.releases_url.clone());
        let bulk_limiter = Arc::new(Semaphore::new(config.bulk_mutation_concurrency));

        Self {
            db,
            http_client,
            config: Arc::new(config),
            registry,
            releases,
            macro_names: MacroNameCache::new(),
            locks: GuildLocks::new(),
            bulk_limiter,
            scheduler_started: Arc::new(AtomicBool::new(false)),
            scheduler: Arc::new(OnceLock::new()),
            shard_manager: Arc::new(OnceLock::new()),
        }
    }
}
