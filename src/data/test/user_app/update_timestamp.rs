use super::*;

/// Tests bumping the timestamp of a matching override.
///
/// Expected: Ok(true) with the new timestamp stored
#[tokio::test]
async fn updates_matching_override() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let old = Utc::now() - Duration::days(2);
    factory::create_user_app(db, 42, "777", old).await?;

    let now = Utc::now();
    let repo = UserAppRepository::new(db);
    let updated = repo.update_timestamp(42, "777", now).await?;

    assert!(updated);
    let found = repo.find_by_user(42).await?.unwrap();
    assert_eq!(found.timestamp.timestamp(), now.timestamp());

    Ok(())
}

/// Tests bumping with an application ID the user's override does not name.
///
/// Expected: Ok(false) with the timestamp unchanged
#[tokio::test]
async fn ignores_other_app() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserApp)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let old = Utc::now() - Duration::days(2);
    factory::create_user_app(db, 42, "777", old).await?;

    let repo = UserAppRepository::new(db);
    let updated = repo.update_timestamp(42, "888", Utc::now()).await?;

    assert!(!updated);
    let found = repo.find_by_user(42).await?.unwrap();
    assert_eq!(found.timestamp.timestamp(), old.timestamp());

    Ok(())
}
