//! Linkage state machine.
//!
//! [`LinkageService`] runs one linking attempt end to end: gather provider
//! outcomes, let [`policy::decide`](crate::policy::decide) pick the status,
//! then persist exactly one [`LinkagePatch`]. The store write is the final
//! step, so a crash before it leaves the record at its prior status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use oleo_core::RecordId;
use oleo_provider::{CredentialProvider, Identity, ProviderError, SignInMethod};
use oleo_store::{BusinessRecord, LinkagePatch, LinkageStatus, NewBusinessRecord, RecordStore};

use crate::error::{LinkageError, LinkageResult};
use crate::policy::{decide, CreateOutcome, SignInOutcome};

/// Result of one run of the state machine.
///
/// Ephemeral: folded into the business record's linkage fields, never
/// persisted as its own entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkageAttemptResult {
    /// The status the record was moved to.
    pub status: LinkageStatus,
    /// Identity reference; `Some` exactly when `status` is `Complete`.
    pub auth_identity_ref: Option<String>,
    /// Human-readable detail for `pending` / `password_mismatch` outcomes.
    pub error_detail: Option<String>,
}

/// Result of registering a record together with its first link attempt.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// The record as stored after the first attempt.
    pub record: BusinessRecord,
    /// The first attempt's result.
    pub link: LinkageAttemptResult,
}

/// Facts gathered by one provider pipeline run.
#[derive(Debug)]
struct PipelineRun {
    create: CreateOutcome,
    sign_in: SignInOutcome,
    identity: Option<Identity>,
    detail: Option<String>,
}

/// The linkage state machine.
///
/// Holds the two external seams as trait objects; all decisions are
/// delegated to the pure policy so this type stays a thin pipeline.
pub struct LinkageService {
    provider: Arc<dyn CredentialProvider>,
    store: Arc<dyn RecordStore>,
    precheck_existing: bool,
}

impl LinkageService {
    /// Create a service over a provider and a store.
    pub fn new(provider: Arc<dyn CredentialProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            provider,
            store,
            precheck_existing: false,
        }
    }

    /// Enable the sign-in-methods pre-check: when the provider already
    /// knows the email with a password method, skip the create call and go
    /// straight to sign-in. An optimization only; lookup failures fall
    /// back to the normal pipeline.
    #[must_use]
    pub fn with_precheck(mut self) -> Self {
        self.precheck_existing = true;
        self
    }

    /// Register a business record and run its first linking attempt.
    ///
    /// Emails are unique per role; a duplicate registration is rejected
    /// before anything is written. The insert happens before the provider
    /// calls, so even a `pending` or `unlinked` outcome leaves a record
    /// behind; the first attempt counts as attempt 1.
    pub async fn register(
        &self,
        new: NewBusinessRecord,
        password: Option<&str>,
    ) -> LinkageResult<RegistrationOutcome> {
        if new.email.trim().is_empty() {
            return Err(LinkageError::validation("email", "must not be empty"));
        }
        if let Some(existing) = self.store.find_by_email(new.role, &new.email).await? {
            return Err(LinkageError::validation(
                "email",
                format!("already registered for role {} ({})", new.role, existing.id),
            ));
        }

        let record = self.store.insert(new).await?;
        let email = record.email.clone();
        let link = self.attempt_link(record.id, &email, password).await?;

        let record = self.store.get(record.id).await?.unwrap_or(record);
        Ok(RegistrationOutcome { record, link })
    }

    /// Run one linking attempt for an existing record.
    ///
    /// With no password the provider is never called and the record is
    /// marked `unlinked`; an empty password counts as no password, so the
    /// provider never sees an empty secret. A record already `complete` is
    /// left untouched (idempotent no-op). Otherwise the create → conflict
    /// → sign-in pipeline runs and exactly one store update persists the
    /// outcome.
    pub async fn attempt_link(
        &self,
        record_id: RecordId,
        email: &str,
        password: Option<&str>,
    ) -> LinkageResult<LinkageAttemptResult> {
        if email.trim().is_empty() {
            return Err(LinkageError::validation("email", "must not be empty"));
        }
        let password = password.filter(|p| !p.is_empty());

        let record = self
            .store
            .get(record_id)
            .await?
            .ok_or(LinkageError::RecordNotFound { record_id })?;

        if record.linkage_status == LinkageStatus::Complete {
            debug!(record_id = %record_id, "record already linked, nothing to do");
            return Ok(LinkageAttemptResult {
                status: LinkageStatus::Complete,
                auth_identity_ref: record.auth_identity_ref,
                error_detail: None,
            });
        }

        let run = match password {
            None => PipelineRun {
                create: CreateOutcome::NotAttempted,
                sign_in: SignInOutcome::NotAttempted,
                identity: None,
                detail: None,
            },
            Some(password) => self.run_pipeline(email, password).await,
        };

        let status = decide(password.is_some(), run.create, run.sign_in);
        let identity_ref = if status == LinkageStatus::Complete {
            run.identity.map(|i| i.identity_ref)
        } else {
            None
        };

        let patch = LinkagePatch {
            status,
            auth_identity_ref: identity_ref.clone(),
            attempts: record.linkage_attempts + 1,
            last_attempt_at: next_attempt_timestamp(record.last_attempt_at),
        };
        self.store.apply_linkage(record_id, &patch).await?;

        match status {
            LinkageStatus::Complete => {
                info!(record_id = %record_id, attempts = patch.attempts, "record linked");
            }
            LinkageStatus::Unlinked => {
                debug!(record_id = %record_id, "registered without credential material");
            }
            _ => {
                warn!(record_id = %record_id, status = %status,
                      detail = run.detail.as_deref().unwrap_or(""),
                      "linking attempt did not complete");
            }
        }

        Ok(LinkageAttemptResult {
            status,
            auth_identity_ref: identity_ref,
            error_detail: run.detail,
        })
    }

    /// Re-run linking for a record with fresh credential material.
    ///
    /// Retries always carry a password; a retry without one is a caller
    /// error. Each call fully re-evaluates provider state and does not
    /// assume the previous attempt's failure mode still holds.
    pub async fn retry_link(
        &self,
        record_id: RecordId,
        email: &str,
        password: &str,
    ) -> LinkageResult<LinkageAttemptResult> {
        if password.is_empty() {
            return Err(LinkageError::validation(
                "password",
                "retries must supply credential material",
            ));
        }
        self.attempt_link(record_id, email, Some(password)).await
    }

    /// Gather provider outcomes for one attempt. Every provider error is
    /// captured as an outcome; nothing is raised from here.
    async fn run_pipeline(&self, email: &str, password: &str) -> PipelineRun {
        if self.precheck_existing && self.email_has_password_method(email).await {
            debug!(email = %email, "pre-check hit, skipping create");
            return self
                .sign_in_fallback(email, password, CreateOutcome::NotAttempted)
                .await;
        }

        match self.provider.create_credential(email, password).await {
            Ok(identity) => PipelineRun {
                create: CreateOutcome::Created,
                sign_in: SignInOutcome::NotAttempted,
                identity: Some(identity),
                detail: None,
            },
            Err(ProviderError::AlreadyExists { .. }) => {
                self.sign_in_fallback(email, password, CreateOutcome::AlreadyExists)
                    .await
            }
            Err(err) => PipelineRun {
                create: CreateOutcome::Failed,
                sign_in: SignInOutcome::NotAttempted,
                identity: None,
                detail: Some(describe(&err)),
            },
        }
    }

    /// Sign in against a pre-existing identity. Success reconciles the
    /// record with that identity; the link is between record and identity,
    /// not an identity creation event.
    async fn sign_in_fallback(
        &self,
        email: &str,
        password: &str,
        create: CreateOutcome,
    ) -> PipelineRun {
        match self.provider.sign_in(email, password).await {
            Ok(identity) => PipelineRun {
                create,
                sign_in: SignInOutcome::SignedIn,
                identity: Some(identity),
                detail: None,
            },
            Err(err @ ProviderError::InvalidCredential { .. }) => PipelineRun {
                create,
                sign_in: SignInOutcome::BadCredential,
                identity: None,
                detail: Some(describe(&err)),
            },
            Err(err) => PipelineRun {
                create,
                sign_in: SignInOutcome::Failed,
                identity: None,
                detail: Some(describe(&err)),
            },
        }
    }

    /// Pre-check lookup; any failure counts as a miss.
    async fn email_has_password_method(&self, email: &str) -> bool {
        match self.provider.list_methods_for_email(email).await {
            Ok(methods) => methods.contains(&SignInMethod::Password),
            Err(err) => {
                debug!(email = %email, code = err.error_code(), "pre-check lookup failed");
                false
            }
        }
    }
}

/// Timestamp for this attempt, clamped so `last_attempt_at` never goes
/// backwards even if the wall clock does.
fn next_attempt_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    previous.map_or(now, |prev| now.max(prev))
}

/// Operator-facing one-liner for a provider error.
fn describe(err: &ProviderError) -> String {
    format!("{}: {err}", err.error_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn attempt_timestamp_never_goes_backwards() {
        let future = Utc::now() + Duration::seconds(60);
        assert_eq!(next_attempt_timestamp(Some(future)), future);
        assert!(next_attempt_timestamp(None) <= Utc::now() + Duration::seconds(1));
    }

    #[test]
    fn describe_includes_the_code() {
        let detail = describe(&ProviderError::unavailable("maintenance"));
        assert!(detail.starts_with("UNAVAILABLE: "));
    }
}
