use super::*;
use crate::service::{
    listener_role::ListenerRoleService, overrides::OverrideService, presence,
    reconcile::RoleReconciler,
};
use crate::error::role::RoleConfigError;

/// Tests a member listening through a known application.
///
/// Verifies that the evaluator reports listening and the reconciler grants the mapped
/// listener role exactly once.
///
/// Expected: one add_role call for the listener role
#[tokio::test]
async fn grants_listener_role_for_known_app() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_member(listening_member(GUILD, USER, "100", vec![FOR_ROLE]));

    let snapshot = gateway.snapshot(USER);
    assert!(presence::is_listening(&snapshot, &registry, None));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert_eq!(outcome.granted, vec![LISTENER_ROLE]);
    assert_eq!(
        gateway.calls(),
        vec![RoleCall::Add {
            user_id: USER,
            role_id: LISTENER_ROLE
        }]
    );

    Ok(())
}

/// Tests a member going offline while holding the listener role.
///
/// Expected: exactly one remove_role call for the listener role
#[tokio::test]
async fn revokes_listener_role_when_offline() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_member(listening_member(
            GUILD,
            USER,
            "100",
            vec![FOR_ROLE, LISTENER_ROLE],
        ));
    gateway.set_presence(USER, PresenceStatus::Offline, vec![listening("100")]);

    RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert_eq!(
        gateway.calls(),
        vec![RoleCall::Remove {
            user_id: USER,
            role_id: LISTENER_ROLE
        }]
    );
    assert_eq!(gateway.roles_of(USER), vec![FOR_ROLE]);

    Ok(())
}

/// Tests an override that expires.
///
/// Verifies that an override for an unknown application is swept after 31 days and
/// that the same activity no longer counts as listening afterwards.
///
/// Expected: override removed, member not listening, no role granted
#[tokio::test]
async fn expired_override_stops_counting() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_member(listening_member(GUILD, USER, "777", vec![FOR_ROLE]));

    let registered_at = Utc::now() - Duration::days(31);
    let overrides = OverrideService::new(db);
    overrides.register(USER, "777", &registry, registered_at).await?;

    let removed = overrides.sweep(&registry, Utc::now()).await?;

    assert_eq!(removed, 1);
    let user_override = overrides.get(USER).await?;
    assert!(user_override.is_none());

    let snapshot = gateway.snapshot(USER);
    assert!(!presence::is_listening(&snapshot, &registry, user_override.as_ref()));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;
    assert!(outcome.is_unchanged());
    assert!(gateway.calls().is_empty());

    Ok(())
}

/// Tests mapping a listener role as a for-role and vice versa.
///
/// Expected: Err(RoleConfigErr) with the existing mapping unchanged
#[tokio::test]
async fn rejects_swapped_mapping() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::new();
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(FOR_ROLE)
        .with_role(LISTENER_ROLE);

    let result = ListenerRoleService::new(db, &gateway, &registry, &locks)
        .set_mapping(GUILD, LISTENER_ROLE, FOR_ROLE)
        .await;

    assert!(matches!(
        result,
        Err(AppError::RoleConfigErr(RoleConfigError::ListenerIsForRole(FOR_ROLE)))
    ));
    let mappings = ListenerRoleRepository::new(db).get_by_guild(GUILD).await?;
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].for_role_id, FOR_ROLE);
    assert_eq!(mappings[0].listener_role_id, LISTENER_ROLE);
    assert!(gateway.calls().is_empty());

    Ok(())
}

/// Tests reconciling the same member twice without changes in between.
///
/// Expected: no role calls on the second pass
#[tokio::test]
async fn reconciliation_is_idempotent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_member(listening_member(GUILD, USER, "100", vec![FOR_ROLE]));
    let reconciler = RoleReconciler::new(db, &gateway, &registry, &locks);

    reconciler
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;
    gateway.clear_calls();

    let second = reconciler
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert!(second.is_unchanged());
    assert!(gateway.calls().is_empty());

    Ok(())
}
