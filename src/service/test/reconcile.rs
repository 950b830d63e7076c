use super::*;
use crate::service::reconcile::RoleReconciler;

const OTHER_FOR_ROLE: u64 = 11;
const OTHER_LISTENER_ROLE: u64 = 21;

/// Tests a member holding two mapped for-roles.
///
/// Verifies that the for-role later in the member's role list decides which listener
/// role is granted.
///
/// Expected: only the listener role of the last held for-role is granted
#[tokio::test]
async fn last_held_for_role_wins() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    factory::create_listener_role(db, GUILD, OTHER_FOR_ROLE, OTHER_LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_role(OTHER_LISTENER_ROLE)
        .with_member(listening_member(
            GUILD,
            USER,
            "100",
            vec![FOR_ROLE, OTHER_FOR_ROLE],
        ));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert_eq!(outcome.granted, vec![OTHER_LISTENER_ROLE]);
    assert!(outcome.revoked.is_empty());
    assert_eq!(
        gateway.roles_of(USER),
        vec![FOR_ROLE, OTHER_FOR_ROLE, OTHER_LISTENER_ROLE]
    );

    Ok(())
}

/// Tests a member holding a listener role other than the one they should hold.
///
/// Expected: the stale listener role is revoked and the right one granted
#[tokio::test]
async fn swaps_listener_roles() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    factory::create_listener_role(db, GUILD, OTHER_FOR_ROLE, OTHER_LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_role(OTHER_LISTENER_ROLE)
        .with_member(listening_member(
            GUILD,
            USER,
            "100",
            vec![FOR_ROLE, OTHER_FOR_ROLE, LISTENER_ROLE],
        ));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert_eq!(outcome.revoked, vec![LISTENER_ROLE]);
    assert_eq!(outcome.granted, vec![OTHER_LISTENER_ROLE]);
    assert_eq!(
        gateway.roles_of(USER),
        vec![FOR_ROLE, OTHER_FOR_ROLE, OTHER_LISTENER_ROLE]
    );

    Ok(())
}

/// Tests a listening member without any mapped for-role.
///
/// Expected: no role calls
#[tokio::test]
async fn ignores_members_without_for_role() -> Result<(), AppError> {
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
        .with_member(listening_member(GUILD, USER, "100", vec![99]));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert!(outcome.is_unchanged());
    assert!(gateway.calls().is_empty());

    Ok(())
}

/// Tests a member matched through their override.
///
/// Verifies that a stale override timestamp is bumped once and a second evaluation at
/// the same time does not write again.
///
/// Expected: role granted and override timestamp moved to the evaluation time
#[tokio::test]
async fn bumps_matched_override() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    factory::create_user_app(db, USER, "777", Utc::now() - Duration::days(2)).await?;
    let registry = KnownAppRegistry::new();
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_member(listening_member(GUILD, USER, "777", vec![FOR_ROLE]));
    let reconciler = RoleReconciler::new(db, &gateway, &registry, &locks);

    let now = Utc::now();
    let outcome = reconciler
        .reconcile_member(GUILD, USER, now)
        .await?;

    assert_eq!(outcome.granted, vec![LISTENER_ROLE]);
    let repo = UserAppRepository::new(db);
    let bumped = repo.find_by_user(USER).await?.unwrap();
    assert_eq!(bumped.timestamp.timestamp(), now.timestamp());

    reconciler
        .reconcile_member(GUILD, USER, now + Duration::hours(1))
        .await?;
    let unchanged = repo.find_by_user(USER).await?.unwrap();
    assert_eq!(unchanged.timestamp.timestamp(), now.timestamp());

    Ok(())
}

/// Tests reconciling after a listener role was deleted outside the bot.
///
/// Expected: the mapping using the deleted role is pruned, the other one is kept
#[tokio::test]
async fn prunes_mappings_of_deleted_roles() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    factory::create_listener_role(db, GUILD, OTHER_FOR_ROLE, OTHER_LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_role(OTHER_LISTENER_ROLE)
        .with_member(listening_member(
            GUILD,
            USER,
            "100",
            vec![FOR_ROLE, OTHER_FOR_ROLE],
        ));
    gateway.delete_role(OTHER_LISTENER_ROLE);

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert_eq!(outcome.granted, vec![LISTENER_ROLE]);
    let mappings = ListenerRoleRepository::new(db).get_by_guild(GUILD).await?;
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].listener_role_id, LISTENER_ROLE);

    Ok(())
}

/// Tests a guild pass where the platform rejects one of the listener roles.
///
/// Expected: the rejection is counted and the other member still gets their role
#[tokio::test]
async fn guild_pass_continues_after_rejection() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    factory::create_listener_role(db, GUILD, OTHER_FOR_ROLE, OTHER_LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_role(OTHER_LISTENER_ROLE)
        .with_member(listening_member(GUILD, 1001, "100", vec![FOR_ROLE]))
        .with_member(listening_member(GUILD, 1002, "100", vec![OTHER_FOR_ROLE]))
        .with_member(idle_member(GUILD, 1003, vec![FOR_ROLE]));
    gateway.reject(LISTENER_ROLE);

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_guild(GUILD, Utc::now())
        .await?;

    assert_eq!(outcome.members, 3);
    assert_eq!(outcome.granted, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(gateway.roles_of(1001), vec![FOR_ROLE]);
    assert_eq!(gateway.roles_of(1002), vec![OTHER_FOR_ROLE, OTHER_LISTENER_ROLE]);

    Ok(())
}

/// Tests the periodic pass over a guild without mappings.
///
/// Expected: no members evaluated and no role calls
#[tokio::test]
async fn reconcile_all_skips_unconfigured_guilds() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD)
        .with_role(LISTENER_ROLE)
        .with_member(listening_member(GUILD, USER, "100", vec![FOR_ROLE]));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_all(Utc::now())
        .await;

    assert_eq!(outcome.members, 0);
    assert!(gateway.calls().is_empty());

    Ok(())
}

/// Tests tearing down a guild.
///
/// Expected: every held listener role is removed and the mappings are kept
#[tokio::test]
async fn teardown_removes_roles_and_keeps_mappings() -> Result<(), AppError> {
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
            1001,
            "100",
            vec![FOR_ROLE, LISTENER_ROLE],
        ))
        .with_member(idle_member(GUILD, 1002, vec![LISTENER_ROLE]))
        .with_member(idle_member(GUILD, 1003, vec![FOR_ROLE]));

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .teardown_all()
        .await;

    assert_eq!(outcome.members, 2);
    assert_eq!(outcome.revoked, 2);
    assert_eq!(gateway.roles_of(1001), vec![FOR_ROLE]);
    assert!(gateway.roles_of(1002).is_empty());
    assert_eq!(
        ListenerRoleRepository::new(db).get_by_guild(GUILD).await?.len(),
        1
    );

    Ok(())
}

/// Tests a presence event handled right after a guild pass granted the role.
///
/// The event was raised before the pass ran, so the roles it observed are out of
/// date by the time the guild lock is free. The member must be re-read under the lock.
///
/// Expected: the listener role is granted exactly once
#[tokio::test]
async fn member_reconcile_after_guild_pass_does_not_grant_twice() -> Result<(), AppError> {
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
    let observed = gateway.snapshot(USER);
    let reconciler = RoleReconciler::new(db, &gateway, &registry, &locks);

    reconciler.reconcile_guild(GUILD, Utc::now()).await?;
    let outcome = reconciler
        .reconcile_member(observed.guild_id, observed.user_id, Utc::now())
        .await?;

    assert!(outcome.is_unchanged());
    assert_eq!(
        gateway.calls(),
        vec![RoleCall::Add {
            user_id: USER,
            role_id: LISTENER_ROLE
        }]
    );

    Ok(())
}

/// Tests reconciling a user who is not a member of the guild.
///
/// Expected: nothing changes and no role calls are made
#[tokio::test]
async fn member_reconcile_skips_unknown_members() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_presence_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, GUILD, FOR_ROLE, LISTENER_ROLE).await?;
    let registry = KnownAppRegistry::with_apps(["100"]);
    let locks = GuildLocks::new();
    let gateway = FakeGateway::new(GUILD).with_role(LISTENER_ROLE);

    let outcome = RoleReconciler::new(db, &gateway, &registry, &locks)
        .reconcile_member(GUILD, USER, Utc::now())
        .await?;

    assert!(outcome.is_unchanged());
    assert!(gateway.calls().is_empty());

    Ok(())
}
