use std::str::FromStr;

use async_trait::async_trait;
use galley_application::ProfileRepository;
use galley_core::{AppError, AppResult, UserId};
use galley_domain::{Profile, Role};
use sqlx::{FromRow, PgPool};


/// PostgreSQL-backed profile repository.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    role: String,
    location_id: Option<String>,
    brand_id: Option<String>,
}

impl ProfileRow {
    fn into_profile(self) -> AppResult<Profile> {
        let role = Role::from_str(self.role.as_str()).map_err(|_| {
            AppError::Validation(format!(
                "profile '{}' has unknown role '{}'",
                self.id, self.role
            ))
        })?;

        Ok(Profile::new(
            UserId::new(self.id)?,
            role,
            self.location_id,
            self.brand_id,
        ))
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_profile(&self, user_id: &UserId) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, role, location_id, brand_id
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load profile for user '{user_id}': {error}"
            ))
        })?;

        row.map(ProfileRow::into_profile).transpose()
    }
}
