use super::*;

/// Tests registering an override for a user without one.
///
/// Expected: Ok with one stored override
#[tokio::test]
async fn creates_override() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = UserAppRepository::new(db);
    let stored = repo.replace(42, "777", now).await?;

    assert_eq!(stored.user_id, 42);
    assert_eq!(stored.app_id, "777");

    let found = repo.find_by_user(42).await?.unwrap();
    assert_eq!(found.app_id, "777");
    assert_eq!(found.timestamp.timestamp(), now.timestamp());

    Ok(())
}

/// Tests registering a second override for the same user.
///
/// Verifies that the previous override is cleared so the user keeps exactly
/// one override, the newest.
///
/// Expected: Ok with a single override naming the new app
#[tokio::test]
async fn replaces_previous_override() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user_app(db, 42, "777", Utc::now() - Duration::days(3)).await?;

    let repo = UserAppRepository::new(db);
    repo.replace(42, "888", Utc::now()).await?;

    assert_eq!(repo.count().await?, 1);
    assert_eq!(repo.find_by_user(42).await?.unwrap().app_id, "888");

    Ok(())
}

/// Tests that replacing one user's override leaves other users alone.
///
/// Expected: Ok with both users' overrides present
#[tokio::test]
async fn keeps_other_users() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user_app(db, 1, "777", Utc::now()).await?;

    let repo = UserAppRepository::new(db);
    repo.replace(2, "888", Utc::now()).await?;

    assert_eq!(repo.count().await?, 2);
    assert_eq!(repo.find_by_user(1).await?.unwrap().app_id, "777");

    Ok(())
}
