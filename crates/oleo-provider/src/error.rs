//! Credential provider error types.
//!
//! Error definitions with transient/permanent classification. The
//! reconciliation policy depends on three distinctions: a create conflict
//! (`AlreadyExists`), a sign-in rejection (`InvalidCredential`), and
//! everything else.

use thiserror::Error;

/// Error that can occur during credential provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The email is already registered with the provider (create conflict).
    ///
    /// Not a failure for the linking core: it triggers the sign-in
    /// fallback, because the identity may already exist under different
    /// provenance.
    #[error("email already registered: {email}")]
    AlreadyExists { email: String },

    /// The provider rejected the supplied credential (sign-in failure).
    ///
    /// A durable, user-actionable outcome: the identity exists but the
    /// caller does not know the right secret for it.
    #[error("invalid credential for {email}")]
    InvalidCredential { email: String },

    /// Network error while reaching the provider.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request to the provider timed out.
    #[error("provider request timed out")]
    Timeout,

    /// The provider throttled the request.
    #[error("rate limited by provider")]
    RateLimited,

    /// The provider is temporarily unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// The provider returned a response the client could not interpret.
    #[error("invalid provider response: {message}")]
    InvalidResponse { message: String },

    /// Any other provider-side failure.
    #[error("provider error: {message}")]
    Other { message: String },
}

impl ProviderError {
    /// Check if this error is transient and a later retry may succeed
    /// without new input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Network { .. }
                | ProviderError::Timeout
                | ProviderError::RateLimited
                | ProviderError::Unavailable { .. }
        )
    }

    /// Check if this error is permanent and retrying with the same input
    /// won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification and logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::AlreadyExists { .. } => "EMAIL_EXISTS",
            ProviderError::InvalidCredential { .. } => "INVALID_CREDENTIAL",
            ProviderError::Network { .. } => "NETWORK_ERROR",
            ProviderError::Timeout => "TIMEOUT",
            ProviderError::RateLimited => "RATE_LIMITED",
            ProviderError::Unavailable { .. } => "UNAVAILABLE",
            ProviderError::InvalidResponse { .. } => "INVALID_RESPONSE",
            ProviderError::Other { .. } => "PROVIDER_ERROR",
        }
    }

    // Convenience constructors

    /// Create an already-exists conflict for an email.
    pub fn already_exists(email: impl Into<String>) -> Self {
        ProviderError::AlreadyExists {
            email: email.into(),
        }
    }

    /// Create an invalid-credential rejection for an email.
    pub fn invalid_credential(email: impl Into<String>) -> Self {
        ProviderError::InvalidCredential {
            email: email.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        ProviderError::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            message: message.into(),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ProviderError::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a catch-all provider error.
    pub fn other(message: impl Into<String>) -> Self {
        ProviderError::Other {
            message: message.into(),
        }
    }
}

/// Result type for credential provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
