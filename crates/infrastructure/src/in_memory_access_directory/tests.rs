use galley_application::{AccessCatalogRepository, ProfileRepository};
use galley_core::{AppError, UserId};
use galley_domain::{CatalogEntry, CatalogKind, Profile, Role};

use super::InMemoryAccessDirectory;

fn user(value: &str) -> UserId {
    match UserId::new(value) {
        Ok(user_id) => user_id,
        Err(error) => panic!("invalid test user id: {error}"),
    }
}

async fn seeded() -> InMemoryAccessDirectory {
    let directory = InMemoryAccessDirectory::new();
    directory
        .upsert_entry(CatalogKind::Location, CatalogEntry::new("loc-42", "Harbor Street"))
        .await;
    directory
        .upsert_entry(CatalogKind::Location, CatalogEntry::new("loc-7", "Airport Terminal"))
        .await;
    directory
        .upsert_entry(CatalogKind::Brand, CatalogEntry::new("brand-taco", "Taco Shack"))
        .await;
    directory
        .upsert_profile(Profile::new(
            user("u1"),
            Role::Employee,
            Some("loc-42".to_owned()),
            None,
        ))
        .await;
    directory
}

#[tokio::test]
async fn find_profile_reads_stored_profile() {
    let directory = seeded().await;

    let found = directory.find_profile(&user("u1")).await;
    let missing = directory.find_profile(&user("u2")).await;

    assert_eq!(
        found.ok().flatten().map(|profile| profile.role()),
        Some(Role::Employee)
    );
    assert!(matches!(missing, Ok(None)));
}

#[tokio::test]
async fn list_granted_filters_catalog_by_grant_rows() {
    let directory = seeded().await;
    assert!(
        directory
            .grant(&user("u1"), CatalogKind::Location, "loc-42")
            .await
            .is_ok()
    );

    let granted = directory
        .list_granted(&user("u1"), CatalogKind::Location)
        .await
        .unwrap_or_default();
    let catalog = directory
        .list_catalog(CatalogKind::Location)
        .await
        .unwrap_or_default();

    assert_eq!(granted, vec![CatalogEntry::new("loc-42", "Harbor Street")]);
    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn grant_requires_existing_catalog_row() {
    let directory = seeded().await;

    let result = directory
        .grant(&user("u1"), CatalogKind::Brand, "brand-missing")
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn revoke_removes_access() {
    let directory = seeded().await;
    assert!(
        directory
            .grant(&user("u1"), CatalogKind::Brand, "brand-taco")
            .await
            .is_ok()
    );

    directory
        .revoke(&user("u1"), CatalogKind::Brand, "brand-taco")
        .await;

    let granted = directory
        .list_granted(&user("u1"), CatalogKind::Brand)
        .await
        .unwrap_or_default();
    assert!(granted.is_empty());
}
