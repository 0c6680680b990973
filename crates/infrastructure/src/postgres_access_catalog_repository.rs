use async_trait::async_trait;
use galley_application::AccessCatalogRepository;
use galley_core::{AppError, AppResult, UserId};
use galley_domain::{CatalogEntry, CatalogKind};
use sqlx::{FromRow, PgPool};

#[cfg(test)]
mod tests;

/// PostgreSQL-backed location and brand catalog repository.
#[derive(Clone)]
pub struct PostgresAccessCatalogRepository {
    pool: PgPool,
}

impl PostgresAccessCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CatalogRow {
    id: String,
    name: String,
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        Self::new(row.id, row.name)
    }
}

fn catalog_sql(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Location => {
            r#"
            SELECT id, name
            FROM locations
            ORDER BY name, id
            "#
        }
        CatalogKind::Brand => {
            r#"
            SELECT id, name
            FROM brands
            ORDER BY name, id
            "#
        }
    }
}

fn granted_sql(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Location => {
            r#"
            SELECT locations.id, locations.name
            FROM user_locations
            INNER JOIN locations ON locations.id = user_locations.location_id
            WHERE user_locations.user_id = $1
            ORDER BY locations.name, locations.id
            "#
        }
        CatalogKind::Brand => {
            r#"
            SELECT brands.id, brands.name
            FROM user_brands
            INNER JOIN brands ON brands.id = user_brands.brand_id
            WHERE user_brands.user_id = $1
            ORDER BY brands.name, brands.id
            "#
        }
    }
}

#[async_trait]
impl AccessCatalogRepository for PostgresAccessCatalogRepository {
    async fn list_catalog(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>> {
        let rows = sqlx::query_as::<_, CatalogRow>(catalog_sql(kind))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list {} catalog: {error}",
                    kind.as_str()
                ))
            })?;

        Ok(rows.into_iter().map(CatalogEntry::from).collect())
    }

    async fn list_granted(
        &self,
        user_id: &UserId,
        kind: CatalogKind,
    ) -> AppResult<Vec<CatalogEntry>> {
        let rows = sqlx::query_as::<_, CatalogRow>(granted_sql(kind))
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list {} grants for user '{user_id}': {error}",
                    kind.as_str()
                ))
            })?;

        Ok(rows.into_iter().map(CatalogEntry::from).collect())
    }
}
