//! Identity value types returned by the credential provider.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An authenticated principal as the provider reports it.
///
/// `identity_ref` is an opaque token owned by the provider; the linking
/// core stores it verbatim on the business record and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque provider-side identifier for the principal.
    pub identity_ref: String,
    /// The email the identity is registered under.
    pub email: String,
}

impl Identity {
    /// Create an identity value.
    pub fn new(identity_ref: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity_ref: identity_ref.into(),
            email: email.into(),
        }
    }
}

/// A sign-in method registered for an email at the provider.
///
/// Used by the optional pre-check path to decide whether to go straight
/// to sign-in instead of create-then-fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignInMethod {
    /// Email + password credential.
    Password,
    /// Magic-link / email-only sign-in.
    EmailLink,
    /// A federated method identified by the provider's name for it
    /// (e.g. "google.com").
    Federated(String),
}

impl SignInMethod {
    /// Parse the provider's wire name for a method.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "password" => SignInMethod::Password,
            "emailLink" => SignInMethod::EmailLink,
            other => SignInMethod::Federated(other.to_string()),
        }
    }
}

impl Display for SignInMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignInMethod::Password => write!(f, "password"),
            SignInMethod::EmailLink => write!(f, "emailLink"),
            SignInMethod::Federated(name) => write!(f, "{name}"),
        }
    }
}
