use crate::{
    data::sponsor::SponsorRepository,
    model::sponsor::{SponsorPlatform, SponsorRoles},
};
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

/// Tests storing and replacing sponsor roles.
///
/// Expected: Ok with the latest roles returned
#[tokio::test]
async fn sets_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_sponsor_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SponsorRepository::new(db);
    assert!(repo.get_roles(1).await?.is_none());

    repo.set_roles(
        1,
        &SponsorRoles {
            monthly_role_id: Some(10),
            one_time_role_id: None,
        },
    )
    .await?;
    repo.set_roles(
        1,
        &SponsorRoles {
            monthly_role_id: Some(10),
            one_time_role_id: Some(11),
        },
    )
    .await?;

    let roles = repo.get_roles(1).await?.unwrap();
    assert_eq!(roles.monthly_role_id, Some(10));
    assert_eq!(roles.one_time_role_id, Some(11));

    Ok(())
}

/// Tests upserting platforms by name.
///
/// Expected: Ok with the emoji replaced and the order kept
#[tokio::test]
async fn upserts_platforms() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_sponsor_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SponsorRepository::new(db);
    let kofi = SponsorPlatform {
        name: "Ko-fi".to_string(),
        emoji: ":coffee:".to_string(),
        url: None,
    };
    let github = SponsorPlatform {
        name: "GitHub".to_string(),
        emoji: ":octocat:".to_string(),
        url: Some("https://github.com/sponsors/x".to_string()),
    };
    repo.upsert_platform(1, &kofi).await?;
    repo.upsert_platform(1, &github).await?;
    repo.upsert_platform(
        1,
        &SponsorPlatform {
            emoji: ":tea:".to_string(),
            ..kofi.clone()
        },
    )
    .await?;

    let platforms = repo.get_platforms(1).await?;
    assert_eq!(platforms.len(), 2);
    assert_eq!(platforms[0].name, "Ko-fi");
    assert_eq!(platforms[0].emoji, ":tea:");
    assert_eq!(platforms[1], github);

    Ok(())
}

/// Tests mapping roles to platforms.
///
/// Expected: Ok with the role moved to its latest platform
#[tokio::test]
async fn sets_platform_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_sponsor_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SponsorRepository::new(db);
    repo.set_platform_role(1, 50, "Ko-fi").await?;
    repo.set_platform_role(1, 50, "GitHub").await?;

    let roles = repo.get_platform_roles(1).await?;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].role_id, 50);
    assert_eq!(roles[0].platform, "GitHub");
    assert!(repo.get_platform_roles(2).await?.is_empty());

    Ok(())
}
