use super::*;

/// Tests mapping a new for-role.
///
/// Expected: Ok with the mapping stored
#[tokio::test]
async fn inserts_new_mapping() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ListenerRoleRepository::new(db);
    repo.upsert(1, 10, 100).await?;

    let mappings = repo.get_by_guild(1).await?;
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].listener_role_id, 100);

    Ok(())
}

/// Tests remapping an already mapped for-role.
///
/// Verifies that the existing row is updated in place instead of a second row
/// being created, so the for-role keeps its overview position.
///
/// Expected: Ok with a single, updated mapping in its original position
#[tokio::test]
async fn replaces_existing_mapping() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ListenerRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_listener_role(db, 1, 10, 100).await?;
    factory::create_listener_role(db, 1, 20, 100).await?;

    let repo = ListenerRoleRepository::new(db);
    repo.upsert(1, 10, 200).await?;

    let mappings = repo.get_by_guild(1).await?;
    assert_eq!(mappings.len(), 2);
    assert_eq!(mappings[0].for_role_id, 10);
    assert_eq!(mappings[0].listener_role_id, 200);

    Ok(())
}
