//! In-memory record store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use oleo_core::RecordId;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::record::{BusinessRecord, LinkagePatch, LinkageStatus, NewBusinessRecord, RecordRole};
use crate::traits::RecordStore;

/// Record store held entirely in memory.
///
/// Mirrors the Postgres adapter's semantics (registration defaults,
/// single linkage write, soft delete) without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<RecordId, BusinessRecord>>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, new: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let now = Utc::now();
        let record = BusinessRecord {
            id: RecordId::new(),
            role: new.role,
            email: new.email,
            display_name: new.display_name,
            auth_identity_ref: None,
            linkage_status: LinkageStatus::Unlinked,
            linkage_attempts: 0,
            last_attempt_at: None,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<BusinessRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        role: RecordRole,
        email: &str,
    ) -> StoreResult<Option<BusinessRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.role == role && r.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_by_status(&self, status: LinkageStatus) -> StoreResult<Vec<BusinessRecord>> {
        let mut records: Vec<BusinessRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.linkage_status == status && r.active)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.last_attempt_at);
        Ok(records)
    }

    async fn apply_linkage(&self, id: RecordId, patch: &LinkagePatch) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound { record_id: id })?;

        record.linkage_status = patch.status;
        record.auth_identity_ref = patch.auth_identity_ref.clone();
        record.linkage_attempts = patch.attempts;
        record.last_attempt_at = Some(patch.last_attempt_at);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn deactivate(&self, id: RecordId) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound { record_id: id })?;
        record.active = false;
        record.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewBusinessRecord {
        NewBusinessRecord {
            role: RecordRole::User,
            email: email.to_string(),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn insert_applies_registration_defaults() {
        let store = InMemoryRecordStore::new();
        let record = store.insert(new_user("a@x.com")).await.expect("insert");

        assert_eq!(record.linkage_status, LinkageStatus::Unlinked);
        assert_eq!(record.linkage_attempts, 0);
        assert!(record.auth_identity_ref.is_none());
        assert!(record.active);
    }

    #[tokio::test]
    async fn find_by_email_is_case_insensitive_and_role_scoped() {
        let store = InMemoryRecordStore::new();
        store.insert(new_user("A@X.com")).await.expect("insert");

        let found = store
            .find_by_email(RecordRole::User, "a@x.com")
            .await
            .expect("query");
        assert!(found.is_some());

        let other_role = store
            .find_by_email(RecordRole::Administrator, "a@x.com")
            .await
            .expect("query");
        assert!(other_role.is_none());
    }

    #[tokio::test]
    async fn apply_linkage_writes_all_linkage_fields() {
        let store = InMemoryRecordStore::new();
        let record = store.insert(new_user("a@x.com")).await.expect("insert");

        let patch = LinkagePatch {
            status: LinkageStatus::Complete,
            auth_identity_ref: Some("uid-1".to_string()),
            attempts: 1,
            last_attempt_at: Utc::now(),
        };
        store.apply_linkage(record.id, &patch).await.expect("patch");

        let updated = store.get(record.id).await.expect("get").expect("present");
        assert_eq!(updated.linkage_status, LinkageStatus::Complete);
        assert_eq!(updated.auth_identity_ref.as_deref(), Some("uid-1"));
        assert_eq!(updated.linkage_attempts, 1);
        assert!(updated.linkage_invariant_holds());
    }

    #[tokio::test]
    async fn apply_linkage_on_missing_record_fails() {
        let store = InMemoryRecordStore::new();
        let patch = LinkagePatch {
            status: LinkageStatus::Pending,
            auth_identity_ref: None,
            attempts: 1,
            last_attempt_at: Utc::now(),
        };

        let err = store
            .apply_linkage(RecordId::new(), &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn deactivated_records_drop_out_of_status_listings() {
        let store = InMemoryRecordStore::new();
        let record = store.insert(new_user("a@x.com")).await.expect("insert");

        let listed = store
            .list_by_status(LinkageStatus::Unlinked)
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);

        store.deactivate(record.id).await.expect("deactivate");
        let listed = store
            .list_by_status(LinkageStatus::Unlinked)
            .await
            .expect("list");
        assert!(listed.is_empty());

        // Soft delete: the record itself is still there.
        assert!(store.get(record.id).await.expect("get").is_some());
    }
}
