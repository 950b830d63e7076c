use super::*;

/// Tests fetching the mappings of one guild.
///
/// Verifies that mappings of other guilds are excluded and the insertion
/// order is kept.
///
/// Expected: Ok with the guild's two mappings in order
#[tokio::test]
async fn returns_guild_mappings_in_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 30, 100).await?;
    factory::create_listener_role(db, 2, 40, 200).await?;
    factory::create_listener_role(db, 1, 10, 100).await?;

    let repo = ListenerRoleRepository::new(db);
    let mappings = repo.get_by_guild(1).await?;

    assert_eq!(mappings.len(), 2);
    assert_eq!(mappings[0].for_role_id, 30);
    assert_eq!(mappings[1].for_role_id, 10);
    assert!(mappings.iter().all(|m| m.guild_id == 1));

    Ok(())
}

/// Tests listing the guilds that have mappings.
///
/// Expected: Ok with each guild listed once
#[tokio::test]
async fn lists_configured_guilds() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 10, 100).await?;
    factory::create_listener_role(db, 1, 20, 100).await?;
    factory::create_listener_role(db, 2, 30, 200).await?;

    let repo = ListenerRoleRepository::new(db);
    let mut guild_ids = repo.guild_ids().await?;
    guild_ids.sort();

    assert_eq!(guild_ids, vec![1, 2]);

    Ok(())
}

/// Tests looking up a single for-role.
///
/// Expected: Ok(Some) for a mapped role, Ok(None) otherwise
#[tokio::test]
async fn finds_by_for_role() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 10, 100).await?;

    let repo = ListenerRoleRepository::new(db);

    let found = repo.find_by_for_role(1, 10).await?.unwrap();
    assert_eq!(found.listener_role_id, 100);
    assert!(repo.find_by_for_role(1, 20).await?.is_none());
    assert!(repo.find_by_for_role(2, 10).await?.is_none());

    Ok(())
}
