//! The credential provider trait.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::identity::{Identity, SignInMethod};

/// External identity service abstraction.
///
/// Implementations must be stateless from the caller's point of view:
/// every method is a plain request/response and the resulting [`Identity`]
/// is passed forward by the caller, never read back out of ambient
/// session state.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Create a new credential for `email` protected by `password`.
    ///
    /// Returns [`ProviderError::AlreadyExists`] when the email is already
    /// registered, which callers treat as a signal to fall back to
    /// [`sign_in`](Self::sign_in).
    ///
    /// [`ProviderError::AlreadyExists`]: crate::error::ProviderError::AlreadyExists
    async fn create_credential(&self, email: &str, password: &str) -> ProviderResult<Identity>;

    /// Sign in with an existing credential.
    ///
    /// Returns [`ProviderError::InvalidCredential`] when the secret does
    /// not match the registered credential.
    ///
    /// [`ProviderError::InvalidCredential`]: crate::error::ProviderError::InvalidCredential
    async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Identity>;

    /// List the sign-in methods registered for an email.
    ///
    /// An empty set means the email is unknown to the provider. Used by an
    /// optional pre-check path; not required for linking correctness.
    async fn list_methods_for_email(&self, email: &str) -> ProviderResult<HashSet<SignInMethod>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    // Minimal in-test provider to exercise the trait object surface.
    struct SingleUserProvider {
        email: String,
        password: String,
    }

    #[async_trait]
    impl CredentialProvider for SingleUserProvider {
        async fn create_credential(
            &self,
            email: &str,
            _password: &str,
        ) -> ProviderResult<Identity> {
            if email == self.email {
                Err(ProviderError::already_exists(email))
            } else {
                Ok(Identity::new("uid-new", email))
            }
        }

        async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Identity> {
            if email == self.email && password == self.password {
                Ok(Identity::new("uid-existing", email))
            } else {
                Err(ProviderError::invalid_credential(email))
            }
        }

        async fn list_methods_for_email(
            &self,
            email: &str,
        ) -> ProviderResult<HashSet<SignInMethod>> {
            let mut methods = HashSet::new();
            if email == self.email {
                methods.insert(SignInMethod::Password);
            }
            Ok(methods)
        }
    }

    #[tokio::test]
    async fn trait_object_dispatch() {
        let provider: Box<dyn CredentialProvider> = Box::new(SingleUserProvider {
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        });

        let created = provider
            .create_credential("b@x.com", "pw")
            .await
            .expect("fresh email creates");
        assert_eq!(created.email, "b@x.com");

        let conflict = provider.create_credential("a@x.com", "pw").await;
        assert!(matches!(
            conflict,
            Err(ProviderError::AlreadyExists { .. })
        ));

        let signed_in = provider
            .sign_in("a@x.com", "secret123")
            .await
            .expect("correct password signs in");
        assert_eq!(signed_in.identity_ref, "uid-existing");

        let methods = provider
            .list_methods_for_email("a@x.com")
            .await
            .expect("lookup");
        assert!(methods.contains(&SignInMethod::Password));
    }
}
