//! Refresh cycle: registry refresh, override sweep, then a reconciliation pass.
//!
//! Phases run in that order and a failing phase is logged without stopping the ones
//! after it, so a catalog outage still sweeps and reconciles against the last known
//! registry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::AppError,
    service::{
        catalog::KnownAppRegistry,
        lock::GuildLocks,
        overrides::OverrideService,
        reconcile::{GuildOutcome, RoleGateway, RoleReconciler},
    },
    state::BotState,
};

/// Result of one refresh cycle; `None` marks a failed phase.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub known_apps: Option<usize>,
    pub swept: Option<usize>,
    pub reconciled: GuildOutcome,
}

pub struct RefreshCycle<'a> {
    db: &'a DatabaseConnection,
    http_client: &'a reqwest::Client,
    players_json_url: &'a str,
    registry: &'a KnownAppRegistry,
    gateway: &'a dyn RoleGateway,
    locks: &'a GuildLocks,
}

impl<'a> RefreshCycle<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        players_json_url: &'a str,
        registry: &'a KnownAppRegistry,
        gateway: &'a dyn RoleGateway,
        locks: &'a GuildLocks,
    ) -> Self {
        Self {
            db,
            http_client,
            players_json_url,
            registry,
            gateway,
            locks,
        }
    }

    /// Runs every phase once.
    pub async fn run(&self, now: DateTime<Utc>) -> CycleReport {
        let mut report = CycleReport::default();

        match self
            .registry
            .refresh(self.db, self.http_client, self.players_json_url)
            .await
        {
            Ok(count) => report.known_apps = Some(count),
            Err(e) => tracing::error!("Failed to refresh application IDs: {}", e),
        }

        match OverrideService::new(self.db).sweep(self.registry, now).await {
            Ok(removed) => {
                if removed > 0 {
                    tracing::info!("Removed {} user app IDs", removed);
                }
                report.swept = Some(removed);
            }
            Err(e) => tracing::error!("Failed to sweep user app IDs: {}", e),
        }

        report.reconciled = RoleReconciler::new(self.db, self.gateway, self.registry, self.locks)
            .reconcile_all(now)
            .await;

        tracing::info!(
            "Refresh cycle done: {} members evaluated, {} roles granted, {} revoked, {} failed",
            report.reconciled.members,
            report.reconciled.granted,
            report.reconciled.revoked,
            report.reconciled.failed
        );

        report
    }
}

async fn run_cycle(state: &BotState, gateway: &dyn RoleGateway) -> CycleReport {
    RefreshCycle::new(
        &state.db,
        &state.http_client,
        &state.config.players_json_url,
        &state.registry,
        gateway,
        &state.locks,
    )
    .run(Utc::now())
    .await
}

/// Runs a refresh cycle now and then on every refresh interval.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `gateway` - Role gateway of the connected shard
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler, kept alive by the caller
/// - `Err(AppError::SchedulerErr)` - Failed to create or start the scheduler
pub async fn start_scheduler(
    state: BotState,
    gateway: Arc<dyn RoleGateway>,
) -> Result<JobScheduler, AppError> {
    run_cycle(&state, gateway.as_ref()).await;

    let scheduler = JobScheduler::new().await?;
    let interval = state.config.refresh_interval;

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let state = state.clone();
        let gateway = gateway.clone();

        Box::pin(async move {
            run_cycle(&state, gateway.as_ref()).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Refresh scheduler started, running every {:?}", interval);

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::user_app::UserAppRepository,
        service::test::gateway::{listening_member, FakeGateway},
    };
    use chrono::Duration;
    use test_utils::{builder::TestBuilder, factory};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    /// Tests a refresh cycle while the catalog answers with a server error.
    ///
    /// Verifies that the registry keeps its previous contents and that the sweep and
    /// reconciliation phases still run.
    ///
    /// Expected: refresh phase failed, expired override swept, listener role granted
    #[tokio::test]
    async fn later_phases_run_after_catalog_failure() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_presence_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/players.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let now = Utc::now();
        factory::create_listener_role(db, 1, 10, 20).await?;
        factory::create_user_app(db, 7, "777", now - Duration::days(31)).await?;
        let registry = KnownAppRegistry::with_apps(["100"]);
        let locks = GuildLocks::new();
        let gateway = FakeGateway::new(1)
            .with_role(20)
            .with_member(listening_member(1, 42, "100", vec![10]));
        let http_client = reqwest::Client::new();
        let url = format!("{}/players.json", server.uri());

        let report = RefreshCycle::new(db, &http_client, &url, &registry, &gateway, &locks)
            .run(now)
            .await;

        assert!(report.known_apps.is_none());
        assert!(registry.contains("100"));
        assert_eq!(report.swept, Some(1));
        assert_eq!(UserAppRepository::new(db).count().await?, 0);
        assert_eq!(report.reconciled.granted, 1);
        assert_eq!(gateway.roles_of(42), vec![10, 20]);

        Ok(())
    }
}
