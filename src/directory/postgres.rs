use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::IdentityDirectory;
use crate::error::AppError;
use crate::models::{Identity, NewIdentity, Role};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS identities (
    id UUID PRIMARY KEY,
    unique_key TEXT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: Uuid,
    unique_key: String,
    credential_hash: String,
    role: String,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AppError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(AppError::DatabaseError)?;
        Ok(Identity {
            id: row.id,
            unique_key: row.unique_key,
            credential_hash: row.credential_hash,
            role,
        })
    }
}

/// Postgres-backed directory. The `UNIQUE` constraint on `unique_key` backs up the
/// workflow's check-then-insert.
#[derive(Debug, Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Creates the `identities` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for PgDirectory {
    async fn find_by_key(&self, unique_key: &str) -> Result<Identity, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, unique_key, credential_hash, role FROM identities WHERE unique_key = $1",
        )
        .bind(unique_key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::NotFound("identity not found".into())),
        }
    }

    async fn insert(&self, identity: NewIdentity) -> Result<Identity, AppError> {
        sqlx::query_as::<_, IdentityRow>(
            "INSERT INTO identities (id, unique_key, credential_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, unique_key, credential_hash, role",
        )
        .bind(Uuid::new_v4())
        .bind(&identity.unique_key)
        .bind(&identity.credential_hash)
        .bind(identity.role.as_str())
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }

    async fn promote(&self, id: Uuid) -> Result<Identity, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "UPDATE identities SET role = $1 WHERE id = $2
             RETURNING id, unique_key, credential_hash, role",
        )
        .bind(Role::Admin.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::NotFound("identity not found".into())),
        }
    }

    async fn count(&self) -> Result<u64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM identities")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
