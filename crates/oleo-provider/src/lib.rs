//! # Credential Provider abstraction
//!
//! The linking core talks to an external identity service through the
//! [`CredentialProvider`] trait: create a credential, sign in with a
//! credential, and list the sign-in methods registered for an email.
//!
//! The trait is deliberately stateless from the caller's point of view.
//! Every call is a plain request/response that returns an [`Identity`]
//! value; there is no ambient "current signed-in user" session for the
//! core to read back out.
//!
//! [`RestCredentialProvider`] binds the trait to an identity-toolkit style
//! HTTP API. Error responses are mapped onto the [`ProviderError`] taxonomy
//! so the reconciliation policy can distinguish "email already registered"
//! from "wrong password" from "provider outage".

pub mod config;
pub mod error;
pub mod identity;
pub mod rest;
pub mod traits;

pub use config::RestProviderConfig;
pub use error::{ProviderError, ProviderResult};
pub use identity::{Identity, SignInMethod};
pub use rest::RestCredentialProvider;
pub use traits::CredentialProvider;
