use super::*;

/// Tests removing a user's override.
///
/// Expected: Ok(true) first, Ok(false) once nothing is left
#[tokio::test]
async fn deletes_override() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user_app(db, 42, "777", Utc::now()).await?;

    let repo = UserAppRepository::new(db);

    assert!(repo.delete_by_user(42).await?);
    assert!(!repo.delete_by_user(42).await?);
    assert!(repo.find_by_user(42).await?.is_none());

    Ok(())
}

/// Tests removing an override that was replaced after it was read.
///
/// Expected: Ok(false) and the newer override is kept
#[tokio::test]
async fn keeps_override_replaced_after_read() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    factory::create_user_app(db, 42, "777", now - Duration::days(31)).await?;

    let repo = UserAppRepository::new(db);
    let read = repo.find_by_user(42).await?.unwrap();
    repo.replace(42, "888", now).await?;

    assert!(!repo.delete_unchanged(&read).await?);
    assert_eq!(repo.find_by_user(42).await?.unwrap().app_id, "888");

    Ok(())
}

/// Tests removing an override that was bumped after it was read.
///
/// Expected: Ok(false) and the bumped override is kept
#[tokio::test]
async fn keeps_override_bumped_after_read() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    factory::create_user_app(db, 42, "777", now - Duration::days(31)).await?;

    let repo = UserAppRepository::new(db);
    let read = repo.find_by_user(42).await?.unwrap();
    repo.update_timestamp(42, "777", now).await?;

    assert!(!repo.delete_unchanged(&read).await?);
    assert!(repo.find_by_user(42).await?.is_some());

    Ok(())
}

/// Tests removing an override that did not change since it was read.
///
/// Expected: Ok(true) and no override left
#[tokio::test]
async fn deletes_unchanged_override() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user_app(db, 42, "777", Utc::now() - Duration::days(31)).await?;

    let repo = UserAppRepository::new(db);
    let read = repo.find_by_user(42).await?.unwrap();

    assert!(repo.delete_unchanged(&read).await?);
    assert!(repo.find_by_user(42).await?.is_none());

    Ok(())
}
