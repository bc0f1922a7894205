//! End-to-end tests for the linkage state machine against a scripted
//! credential provider and the in-memory record store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use oleo_core::RecordId;
use oleo_linkage::{LinkageError, LinkageService};
use oleo_provider::{
    CredentialProvider, Identity, ProviderError, ProviderResult, SignInMethod,
};
use oleo_store::{
    BusinessRecord, InMemoryRecordStore, LinkagePatch, LinkageStatus, NewBusinessRecord,
    RecordRole, RecordStore, StoreError, StoreResult,
};

/// Scripted provider with a seedable account table, an outage switch and
/// call counters.
#[derive(Default)]
struct FakeProvider {
    /// email -> (password, identity_ref)
    accounts: RwLock<HashMap<String, (String, String)>>,
    outage: AtomicBool,
    methods_fail: AtomicBool,
    create_calls: AtomicUsize,
    sign_in_calls: AtomicUsize,
    method_calls: AtomicUsize,
}

impl FakeProvider {
    fn new() -> Self {
        Self::default()
    }

    async fn with_account(self, email: &str, password: &str, identity_ref: &str) -> Self {
        self.accounts.write().await.insert(
            email.to_string(),
            (password.to_string(), identity_ref.to_string()),
        );
        self
    }

    fn set_outage(&self, on: bool) {
        self.outage.store(on, Ordering::SeqCst);
    }

    fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    fn method_calls(&self) -> usize {
        self.method_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for FakeProvider {
    async fn create_credential(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.outage.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("simulated outage"));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(ProviderError::already_exists(email));
        }

        let identity_ref = format!("uid-{}", accounts.len() + 1);
        accounts.insert(
            email.to_string(),
            (password.to_string(), identity_ref.clone()),
        );
        Ok(Identity::new(identity_ref, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if self.outage.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("simulated outage"));
        }

        match self.accounts.read().await.get(email) {
            Some((stored, identity_ref)) if stored == password => {
                Ok(Identity::new(identity_ref.clone(), email))
            }
            _ => Err(ProviderError::invalid_credential(email)),
        }
    }

    async fn list_methods_for_email(&self, email: &str) -> ProviderResult<HashSet<SignInMethod>> {
        self.method_calls.fetch_add(1, Ordering::SeqCst);
        if self.methods_fail.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("lookup down"));
        }

        let mut methods = HashSet::new();
        if self.accounts.read().await.contains_key(email) {
            methods.insert(SignInMethod::Password);
        }
        Ok(methods)
    }
}

/// Provider where every call fails with an unclassified error.
struct BrokenProvider;

#[async_trait]
impl CredentialProvider for BrokenProvider {
    async fn create_credential(&self, _: &str, _: &str) -> ProviderResult<Identity> {
        Err(ProviderError::other("boom"))
    }

    async fn sign_in(&self, _: &str, _: &str) -> ProviderResult<Identity> {
        Err(ProviderError::other("boom"))
    }

    async fn list_methods_for_email(&self, _: &str) -> ProviderResult<HashSet<SignInMethod>> {
        Err(ProviderError::other("boom"))
    }
}

/// Store whose linkage write always fails, for hard-failure propagation.
struct PoisonedStore {
    inner: InMemoryRecordStore,
}

#[async_trait]
impl RecordStore for PoisonedStore {
    async fn insert(&self, new: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        self.inner.insert(new).await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<BusinessRecord>> {
        self.inner.get(id).await
    }

    async fn find_by_email(
        &self,
        role: RecordRole,
        email: &str,
    ) -> StoreResult<Option<BusinessRecord>> {
        self.inner.find_by_email(role, email).await
    }

    async fn list_by_status(&self, status: LinkageStatus) -> StoreResult<Vec<BusinessRecord>> {
        self.inner.list_by_status(status).await
    }

    async fn apply_linkage(&self, _: RecordId, _: &LinkagePatch) -> StoreResult<()> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn deactivate(&self, id: RecordId) -> StoreResult<()> {
        self.inner.deactivate(id).await
    }
}

fn new_user(email: &str) -> NewBusinessRecord {
    NewBusinessRecord {
        role: RecordRole::User,
        email: email.to_string(),
        display_name: Some("Test User".to_string()),
    }
}

fn service(
    provider: Arc<dyn CredentialProvider>,
) -> (LinkageService, Arc<InMemoryRecordStore>) {
    let store = Arc::new(InMemoryRecordStore::new());
    (LinkageService::new(provider, store.clone()), store)
}

#[tokio::test]
async fn scenario_a_fresh_email_links_by_create() {
    let provider = Arc::new(FakeProvider::new());
    let (service, store) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::Complete);
    assert!(outcome.link.auth_identity_ref.is_some());
    assert_eq!(outcome.record.linkage_attempts, 1);
    assert!(outcome.record.linkage_invariant_holds());
    assert_eq!(provider.create_calls(), 1);
    assert_eq!(provider.sign_in_calls(), 0);

    let stored = store
        .get(outcome.record.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.linkage_status, LinkageStatus::Complete);
}

#[tokio::test]
async fn scenario_b_existing_identity_links_by_sign_in() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_account("a@x.com", "secret123", "uid-7")
            .await,
    );
    let (service, _) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::Complete);
    // The sign-in result's identity, not a fabricated one.
    assert_eq!(outcome.link.auth_identity_ref.as_deref(), Some("uid-7"));
    assert_eq!(outcome.record.linkage_attempts, 1);
    assert_eq!(provider.create_calls(), 1);
    assert_eq!(provider.sign_in_calls(), 1);
}

#[tokio::test]
async fn scenario_c_wrong_password_is_password_mismatch() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_account("a@x.com", "the-real-one", "uid-7")
            .await,
    );
    let (service, _) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("wrong-guess"))
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::PasswordMismatch);
    assert!(outcome.link.auth_identity_ref.is_none());
    assert_eq!(outcome.record.linkage_attempts, 1);
    assert!(outcome.record.linkage_invariant_holds());
    let detail = outcome.link.error_detail.expect("detail for operators");
    assert!(detail.contains("INVALID_CREDENTIAL"));
}

#[tokio::test]
async fn scenario_d_provider_outage_is_pending() {
    let provider = Arc::new(FakeProvider::new());
    provider.set_outage(true);
    let (service, _) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::Pending);
    assert!(outcome.link.auth_identity_ref.is_none());
    assert_eq!(outcome.record.linkage_attempts, 1);
    let detail = outcome.link.error_detail.expect("detail for operators");
    assert!(detail.contains("UNAVAILABLE"));
}

#[tokio::test]
async fn scenario_e_retry_with_corrected_password_completes() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_account("a@x.com", "the-real-one", "uid-7")
            .await,
    );
    let (service, store) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("wrong-guess"))
        .await
        .expect("register");
    assert_eq!(outcome.link.status, LinkageStatus::PasswordMismatch);

    let result = service
        .retry_link(outcome.record.id, "a@x.com", "the-real-one")
        .await
        .expect("retry");

    assert_eq!(result.status, LinkageStatus::Complete);
    assert_eq!(result.auth_identity_ref.as_deref(), Some("uid-7"));

    let stored = store
        .get(outcome.record.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.linkage_attempts, 2);
    assert!(stored.linkage_invariant_holds());
}

#[tokio::test]
async fn duplicate_registration_for_a_role_is_rejected() {
    let provider = Arc::new(FakeProvider::new());
    let (service, store) = service(provider.clone());

    service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("first registration");

    let err = service
        .register(new_user("A@X.com"), Some("secret123"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkageError::Validation { field: "email", .. }));

    // Same email under a different role is a different record.
    let admin = NewBusinessRecord {
        role: RecordRole::Administrator,
        email: "a@x.com".to_string(),
        display_name: None,
    };
    let outcome = service
        .register(admin, Some("secret123"))
        .await
        .expect("different role registers");
    assert_eq!(outcome.record.role, RecordRole::Administrator);

    let users = store.list_by_status(LinkageStatus::Complete).await.expect("list");
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn no_password_never_touches_the_provider() {
    let provider = Arc::new(FakeProvider::new());
    let (service, _) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), None)
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::Unlinked);
    assert!(outcome.link.auth_identity_ref.is_none());
    assert_eq!(outcome.record.linkage_attempts, 1);
    assert_eq!(provider.create_calls(), 0);
    assert_eq!(provider.sign_in_calls(), 0);
    assert_eq!(provider.method_calls(), 0);
}

#[tokio::test]
async fn empty_password_counts_as_no_credential_material() {
    let provider = Arc::new(FakeProvider::new());
    let (service, _) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some(""))
        .await
        .expect("register");

    // Same as registering without a password: unlinked, provider untouched.
    assert_eq!(outcome.link.status, LinkageStatus::Unlinked);
    assert!(outcome.link.auth_identity_ref.is_none());
    assert_eq!(provider.create_calls(), 0);
    assert_eq!(provider.sign_in_calls(), 0);
}

#[tokio::test]
async fn provider_that_always_fails_never_raises() {
    let (service, _) = service(Arc::new(BrokenProvider));

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("a broken provider must not surface as an error");

    assert_eq!(outcome.link.status, LinkageStatus::Pending);
    assert!(outcome.link.error_detail.is_some());
}

#[tokio::test]
async fn complete_records_are_an_idempotent_no_op() {
    let provider = Arc::new(FakeProvider::new());
    let (service, store) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");
    assert_eq!(outcome.link.status, LinkageStatus::Complete);
    let calls_after_first = provider.create_calls();

    let again = service
        .attempt_link(outcome.record.id, "a@x.com", Some("secret123"))
        .await
        .expect("re-invocation");

    assert_eq!(again.status, LinkageStatus::Complete);
    assert_eq!(
        again.auth_identity_ref,
        outcome.link.auth_identity_ref,
        "the existing identity is reported back"
    );
    assert_eq!(provider.create_calls(), calls_after_first);

    let stored = store
        .get(outcome.record.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.linkage_attempts, 1, "no attempt was consumed");
}

#[tokio::test]
async fn retry_without_password_is_rejected_before_any_side_effect() {
    let provider = Arc::new(FakeProvider::new());
    let (service, store) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), None)
        .await
        .expect("register");

    let err = service
        .retry_link(outcome.record.id, "a@x.com", "")
        .await
        .unwrap_err();
    assert!(matches!(err, LinkageError::Validation { field: "password", .. }));

    assert_eq!(provider.create_calls(), 0);
    let stored = store
        .get(outcome.record.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.linkage_attempts, 1, "record untouched by the retry");
}

#[tokio::test]
async fn empty_email_is_rejected_before_any_side_effect() {
    let provider = Arc::new(FakeProvider::new());
    let (service, _) = service(provider.clone());

    let err = service
        .attempt_link(RecordId::new(), "  ", Some("secret123"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkageError::Validation { field: "email", .. }));
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn unknown_record_is_reported() {
    let (service, _) = service(Arc::new(FakeProvider::new()));

    let err = service
        .attempt_link(RecordId::new(), "a@x.com", Some("secret123"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkageError::RecordNotFound { .. }));
}

#[tokio::test]
async fn failed_store_write_propagates_to_the_caller() {
    let store = Arc::new(PoisonedStore {
        inner: InMemoryRecordStore::new(),
    });
    let record = store.insert(new_user("a@x.com")).await.expect("insert");
    let service = LinkageService::new(Arc::new(FakeProvider::new()), store);

    let err = service
        .attempt_link(record.id, "a@x.com", Some("secret123"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkageError::Store(_)));
}

#[tokio::test]
async fn attempts_count_up_and_timestamps_never_regress() {
    let provider = Arc::new(FakeProvider::new());
    provider.set_outage(true);
    let (service, store) = service(provider.clone());

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");
    let first = store
        .get(outcome.record.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(first.linkage_status, LinkageStatus::Pending);
    assert_eq!(first.linkage_attempts, 1);
    let first_ts = first.last_attempt_at.expect("stamped");

    provider.set_outage(false);
    let result = service
        .retry_link(outcome.record.id, "a@x.com", "secret123")
        .await
        .expect("retry");
    assert_eq!(result.status, LinkageStatus::Complete);

    let second = store
        .get(outcome.record.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(second.linkage_attempts, 2);
    assert!(second.last_attempt_at.expect("stamped") >= first_ts);
}

#[tokio::test]
async fn precheck_routes_known_emails_straight_to_sign_in() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_account("a@x.com", "secret123", "uid-7")
            .await,
    );
    let store = Arc::new(InMemoryRecordStore::new());
    let service = LinkageService::new(provider.clone(), store).with_precheck();

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::Complete);
    assert_eq!(outcome.link.auth_identity_ref.as_deref(), Some("uid-7"));
    assert_eq!(provider.method_calls(), 1);
    assert_eq!(provider.create_calls(), 0, "create skipped on pre-check hit");
    assert_eq!(provider.sign_in_calls(), 1);
}

#[tokio::test]
async fn precheck_lookup_failure_falls_back_to_create() {
    let provider = Arc::new(FakeProvider::new());
    provider.methods_fail.store(true, Ordering::SeqCst);
    let store = Arc::new(InMemoryRecordStore::new());
    let service = LinkageService::new(provider.clone(), store).with_precheck();

    let outcome = service
        .register(new_user("a@x.com"), Some("secret123"))
        .await
        .expect("register");

    assert_eq!(outcome.link.status, LinkageStatus::Complete);
    assert_eq!(provider.method_calls(), 1);
    assert_eq!(provider.create_calls(), 1, "fell back to the normal path");
}
