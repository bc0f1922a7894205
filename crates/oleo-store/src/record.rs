//! Business record model.
//!
//! A [`BusinessRecord`] is a stored person/organization entity with a role.
//! Its linkage fields (`linkage_status`, `auth_identity_ref`,
//! `linkage_attempts`, `last_attempt_at`) are mutated only through
//! [`LinkagePatch`]; everything else belongs to unrelated CRUD flows.

use chrono::{DateTime, Utc};
use oleo_core::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::StoreError;

/// Role a business record holds within the association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordRole {
    /// Back-office administrator.
    Administrator,
    /// Commercial agent.
    CommercialAgent,
    /// Generic user.
    User,
}

impl RecordRole {
    /// Stable storage string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordRole::Administrator => "administrator",
            RecordRole::CommercialAgent => "commercial_agent",
            RecordRole::User => "user",
        }
    }
}

impl Display for RecordRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordRole {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(RecordRole::Administrator),
            "commercial_agent" => Ok(RecordRole::CommercialAgent),
            "user" => Ok(RecordRole::User),
            other => Err(StoreError::InvalidValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of the most recent linking attempt, persisted on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkageStatus {
    /// Linked: an authentication identity is associated with the record.
    Complete,
    /// A transient provider failure interrupted linking; retryable.
    Pending,
    /// The identity exists but the supplied secret was wrong; needs
    /// operator input.
    PasswordMismatch,
    /// No credential material was supplied; the record deliberately has no
    /// authentication capability yet.
    Unlinked,
}

impl LinkageStatus {
    /// Stable storage string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkageStatus::Complete => "complete",
            LinkageStatus::Pending => "pending",
            LinkageStatus::PasswordMismatch => "password_mismatch",
            LinkageStatus::Unlinked => "unlinked",
        }
    }

    /// Whether an operator retry with fresh credentials can move the
    /// record forward.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LinkageStatus::Complete)
    }
}

impl Display for LinkageStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkageStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(LinkageStatus::Complete),
            "pending" => Ok(LinkageStatus::Pending),
            "password_mismatch" => Ok(LinkageStatus::PasswordMismatch),
            "unlinked" => Ok(LinkageStatus::Unlinked),
            other => Err(StoreError::InvalidValue {
                field: "linkage_status",
                value: other.to_string(),
            }),
        }
    }
}

/// A stored business record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Store-assigned stable identifier.
    pub id: RecordId,
    /// Role of the record holder.
    pub role: RecordRole,
    /// Linking key; treated as unique within a role.
    pub email: String,
    /// Display name for operator output.
    pub display_name: Option<String>,
    /// Opaque reference to the linked authentication identity.
    /// Present if and only if `linkage_status == Complete`.
    pub auth_identity_ref: Option<String>,
    /// Outcome of the most recent linking attempt.
    pub linkage_status: LinkageStatus,
    /// Number of linking attempts; >= 1 once registered.
    pub linkage_attempts: i32,
    /// Timestamp of the most recent attempt; non-decreasing.
    pub last_attempt_at: Option<DateTime<Utc>>,
    /// Soft-delete flag; deactivated records are kept, never hard-deleted.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BusinessRecord {
    /// Check the linkage invariant: an identity ref is present exactly when
    /// the status is `Complete`.
    pub fn linkage_invariant_holds(&self) -> bool {
        self.auth_identity_ref.is_some() == (self.linkage_status == LinkageStatus::Complete)
    }
}

/// Input for creating a business record. Linkage fields start at their
/// registration defaults (`unlinked`, zero attempts) and are set by the
/// first linking attempt.
#[derive(Debug, Clone)]
pub struct NewBusinessRecord {
    pub role: RecordRole,
    pub email: String,
    pub display_name: Option<String>,
}

/// The linkage fields written back after one run of the state machine.
///
/// This is the only way linkage fields change; one patch per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkagePatch {
    /// New status for the record.
    pub status: LinkageStatus,
    /// Identity reference; must be `Some` exactly when `status` is
    /// `Complete`.
    pub auth_identity_ref: Option<String>,
    /// New attempt count (previous count plus one).
    pub attempts: i32,
    /// Timestamp of this attempt.
    pub last_attempt_at: DateTime<Utc>,
}
