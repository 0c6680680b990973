use galley_application::AccessCatalogRepository;
use galley_core::UserId;
use galley_domain::CatalogKind;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresAccessCatalogRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres catalog tests: {error}");
    }

    Some(pool)
}

async fn insert_location(pool: &PgPool, id: &str, name: &str) {
    let insert = sqlx::query("INSERT INTO locations (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await;
    assert!(insert.is_ok());
}

async fn grant_location(pool: &PgPool, user_id: &UserId, location_id: &str) {
    let insert = sqlx::query("INSERT INTO user_locations (user_id, location_id) VALUES ($1, $2)")
        .bind(user_id.as_str())
        .bind(location_id)
        .execute(pool)
        .await;
    assert!(insert.is_ok());
}

#[tokio::test]
async fn granted_locations_follow_join_rows_only() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let suffix = Uuid::new_v4();
    let granted = format!("loc-granted-{suffix}");
    let other = format!("loc-other-{suffix}");
    insert_location(&pool, granted.as_str(), "Harbor Street").await;
    insert_location(&pool, other.as_str(), "Airport Terminal").await;

    let user_id = match UserId::new(format!("user-{suffix}")) {
        Ok(user_id) => user_id,
        Err(error) => panic!("invalid generated user id: {error}"),
    };
    grant_location(&pool, &user_id, granted.as_str()).await;

    let repository = PostgresAccessCatalogRepository::new(pool);
    let locations = repository
        .list_granted(&user_id, CatalogKind::Location)
        .await
        .unwrap_or_default();
    let brands = repository
        .list_granted(&user_id, CatalogKind::Brand)
        .await
        .unwrap_or_default();

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].id, granted);
    assert_eq!(locations[0].name, "Harbor Street");
    assert!(brands.is_empty());
}

#[tokio::test]
async fn full_catalog_is_ordered_by_name() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let suffix = Uuid::new_v4();
    let zulu = format!("loc-z-{suffix}");
    let alpha = format!("loc-a-{suffix}");
    insert_location(&pool, zulu.as_str(), format!("Zulu {suffix}").as_str()).await;
    insert_location(&pool, alpha.as_str(), format!("Alpha {suffix}").as_str()).await;

    let repository = PostgresAccessCatalogRepository::new(pool);
    let locations = repository
        .list_catalog(CatalogKind::Location)
        .await
        .unwrap_or_default();

    let alpha_index = locations.iter().position(|entry| entry.id == alpha);
    let zulu_index = locations.iter().position(|entry| entry.id == zulu);
    assert!(alpha_index.is_some());
    assert!(alpha_index < zulu_index);
}
