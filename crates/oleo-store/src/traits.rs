//! The record store trait.

use async_trait::async_trait;
use oleo_core::RecordId;

use crate::error::StoreResult;
use crate::record::{BusinessRecord, LinkagePatch, LinkageStatus, NewBusinessRecord, RecordRole};

/// Storage seam for business records.
///
/// The linking core only ever writes linkage fields, and only through
/// [`apply_linkage`](Self::apply_linkage); profile edits and activation
/// toggles belong to unrelated CRUD flows and touch disjoint fields.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new business record with registration defaults
    /// (`unlinked`, zero attempts, active).
    async fn insert(&self, new: NewBusinessRecord) -> StoreResult<BusinessRecord>;

    /// Fetch a record by ID. `Ok(None)` when it does not exist.
    async fn get(&self, id: RecordId) -> StoreResult<Option<BusinessRecord>>;

    /// Find a record by role and email (the linking key; emails are
    /// compared case-insensitively and treated as unique within a role).
    async fn find_by_email(
        &self,
        role: RecordRole,
        email: &str,
    ) -> StoreResult<Option<BusinessRecord>>;

    /// List active records currently in the given linkage status, oldest
    /// attempt first.
    async fn list_by_status(&self, status: LinkageStatus) -> StoreResult<Vec<BusinessRecord>>;

    /// Persist the outcome of one linking attempt.
    ///
    /// This is the single linkage write per attempt. Implementations that
    /// duplicate linkage data across tables must hide both writes behind
    /// this one method.
    async fn apply_linkage(&self, id: RecordId, patch: &LinkagePatch) -> StoreResult<()>;

    /// Soft-delete a record. The record is kept and its linkage state is
    /// left untouched.
    async fn deactivate(&self, id: RecordId) -> StoreResult<()>;
}
