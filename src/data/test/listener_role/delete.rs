use super::*;

/// Tests removing a single for-role mapping.
///
/// Expected: Ok(true) once, then Ok(false)
#[tokio::test]
async fn deletes_for_role() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 10, 100).await?;
    factory::create_listener_role(db, 1, 20, 100).await?;

    let repo = ListenerRoleRepository::new(db);

    assert!(repo.delete_for_role(1, 10).await?);
    assert!(!repo.delete_for_role(1, 10).await?);
    assert_eq!(repo.get_by_guild(1).await?.len(), 1);

    Ok(())
}

/// Tests pruning every mapping of a listener role.
///
/// Expected: Ok with only the other listener role's mapping left
#[tokio::test]
async fn deletes_by_listener_role() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 10, 100).await?;
    factory::create_listener_role(db, 1, 20, 100).await?;
    factory::create_listener_role(db, 1, 30, 300).await?;
    factory::create_listener_role(db, 2, 10, 100).await?;

    let repo = ListenerRoleRepository::new(db);
    let removed = repo.delete_by_listener_role(1, 100).await?;

    assert_eq!(removed, 2);
    let remaining = repo.get_by_guild(1).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].listener_role_id, 300);
    assert_eq!(repo.get_by_guild(2).await?.len(), 1);

    Ok(())
}

/// Tests removing a whole guild.
///
/// Expected: Ok with the other guild untouched
#[tokio::test]
async fn deletes_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 10, 100).await?;
    factory::create_listener_role(db, 1, 20, 200).await?;
    factory::create_listener_role(db, 2, 10, 100).await?;

    let repo = ListenerRoleRepository::new(db);

    assert_eq!(repo.delete_guild(1).await?, 2);
    assert!(repo.get_by_guild(1).await?.is_empty());
    assert_eq!(repo.guild_ids().await?, vec![2]);

    Ok(())
}
