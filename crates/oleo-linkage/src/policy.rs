//! Reconciliation policy.
//!
//! [`decide`] encodes the whole branch table of the linking pipeline as a
//! pure function over what was observed, with no I/O. The state machine
//! gathers the facts; this module turns them into a status.

use oleo_store::LinkageStatus;

/// What happened when the pipeline tried to create a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateOutcome {
    /// No create call was made (no password, or the pre-check routed
    /// straight to sign-in).
    NotAttempted,
    /// The credential was created.
    Created,
    /// The email is already registered with the provider.
    AlreadyExists,
    /// The create call failed for some other reason.
    Failed,
}

/// What happened when the pipeline tried the sign-in fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignInOutcome {
    /// No sign-in call was made.
    NotAttempted,
    /// Sign-in succeeded against a pre-existing identity.
    SignedIn,
    /// The provider rejected the supplied secret.
    BadCredential,
    /// The sign-in call failed for some other reason.
    Failed,
}

/// Decide the linkage status from the observed provider outcomes.
///
/// Rules, in order:
/// - no password supplied → `Unlinked` (a deliberate "no auth yet" record,
///   never `Pending`);
/// - an identity was obtained, by create or by sign-in → `Complete`;
/// - the identity exists but the secret was rejected → `PasswordMismatch`,
///   a durable operator-actionable state;
/// - anything else → `Pending`: the cause may be transient, the record is
///   saved as linkable-later rather than failed.
pub fn decide(
    has_password: bool,
    create: CreateOutcome,
    sign_in: SignInOutcome,
) -> LinkageStatus {
    if !has_password {
        return LinkageStatus::Unlinked;
    }

    match (create, sign_in) {
        (CreateOutcome::Created, _) => LinkageStatus::Complete,
        (_, SignInOutcome::SignedIn) => LinkageStatus::Complete,
        (_, SignInOutcome::BadCredential) => LinkageStatus::PasswordMismatch,
        _ => LinkageStatus::Pending,
    }
}
