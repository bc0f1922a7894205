//! Postgres record store.
//!
//! Business records live in `business_records`. For compatibility with the
//! rest of the dashboard the linked identity is also mirrored into
//! `auth_accounts` (keyed by identity ref); both writes happen inside one
//! transaction behind [`RecordStore::apply_linkage`] so callers see a
//! single store update per attempt.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use oleo_core::RecordId;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::record::{BusinessRecord, LinkagePatch, LinkageStatus, NewBusinessRecord, RecordRole};
use crate::traits::RecordStore;

/// Record store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }
}

/// Internal row type for queries.
#[derive(Debug, sqlx::FromRow)]
struct BusinessRecordRow {
    id: Uuid,
    role: String,
    email: String,
    display_name: Option<String>,
    auth_identity_ref: Option<String>,
    linkage_status: String,
    linkage_attempts: i32,
    last_attempt_at: Option<DateTime<Utc>>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BusinessRecordRow> for BusinessRecord {
    type Error = StoreError;

    fn try_from(row: BusinessRecordRow) -> Result<Self, Self::Error> {
        Ok(BusinessRecord {
            id: RecordId::from_uuid(row.id),
            role: row.role.parse()?,
            email: row.email,
            display_name: row.display_name,
            auth_identity_ref: row.auth_identity_ref,
            linkage_status: row.linkage_status.parse()?,
            linkage_attempts: row.linkage_attempts,
            last_attempt_at: row.last_attempt_at,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const RECORD_COLUMNS: &str = "id, role, email, display_name, auth_identity_ref, \
     linkage_status, linkage_attempts, last_attempt_at, active, created_at, updated_at";

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, new: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let row: BusinessRecordRow = sqlx::query_as(&format!(
            r"
            INSERT INTO business_records (role, email, display_name, linkage_status)
            VALUES ($1, $2, $3, 'unlinked')
            RETURNING {RECORD_COLUMNS}
            ",
        ))
        .bind(new.role.as_str())
        .bind(&new.email)
        .bind(&new.display_name)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<BusinessRecord>> {
        let row: Option<BusinessRecordRow> = sqlx::query_as(&format!(
            "SELECT {RECORD_COLUMNS} FROM business_records WHERE id = $1",
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_email(
        &self,
        role: RecordRole,
        email: &str,
    ) -> StoreResult<Option<BusinessRecord>> {
        let row: Option<BusinessRecordRow> = sqlx::query_as(&format!(
            r"
            SELECT {RECORD_COLUMNS} FROM business_records
            WHERE role = $1 AND LOWER(email) = LOWER($2)
            ",
        ))
        .bind(role.as_str())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_by_status(&self, status: LinkageStatus) -> StoreResult<Vec<BusinessRecord>> {
        let rows: Vec<BusinessRecordRow> = sqlx::query_as(&format!(
            r"
            SELECT {RECORD_COLUMNS} FROM business_records
            WHERE linkage_status = $1 AND active
            ORDER BY last_attempt_at ASC NULLS FIRST
            ",
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn apply_linkage(&self, id: RecordId, patch: &LinkagePatch) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE business_records
            SET linkage_status = $2,
                auth_identity_ref = $3,
                linkage_attempts = $4,
                last_attempt_at = $5,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .bind(patch.status.as_str())
        .bind(&patch.auth_identity_ref)
        .bind(patch.attempts)
        .bind(patch.last_attempt_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound { record_id: id });
        }

        // Mirror the linked identity into the compat table the rest of the
        // dashboard reads by auth uid.
        if let Some(identity_ref) = &patch.auth_identity_ref {
            sqlx::query(
                r"
                INSERT INTO auth_accounts (identity_ref, record_id, email, linked_at)
                SELECT $1, id, email, $3 FROM business_records WHERE id = $2
                ON CONFLICT (identity_ref)
                DO UPDATE SET record_id = EXCLUDED.record_id,
                              email = EXCLUDED.email,
                              linked_at = EXCLUDED.linked_at
                ",
            )
            .bind(identity_ref)
            .bind(id.as_uuid())
            .bind(patch.last_attempt_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(record_id = %id, status = %patch.status, attempts = patch.attempts,
               "linkage persisted");
        Ok(())
    }

    async fn deactivate(&self, id: RecordId) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE business_records SET active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound { record_id: id });
        }
        Ok(())
    }
}
