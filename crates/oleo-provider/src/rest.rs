//! REST credential provider.
//!
//! Binds [`CredentialProvider`] to an identity-toolkit style HTTP API:
//! `accounts:signUp`, `accounts:signInWithPassword` and
//! `accounts:createAuthUri`. API error codes are mapped onto the
//! [`ProviderError`] taxonomy; the caller never sees raw HTTP failures.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::RestProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::identity::{Identity, SignInMethod};
use crate::traits::CredentialProvider;

/// Credential provider backed by an identity-toolkit style REST API.
pub struct RestCredentialProvider {
    config: RestProviderConfig,
    client: Client,
}

impl std::fmt::Debug for RestCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCredentialProvider")
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUriResponse {
    #[serde(rename = "signinMethods", default)]
    signin_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl RestCredentialProvider {
    /// Create a provider from a validated configuration.
    pub fn new(config: RestProviderConfig) -> ProviderResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .map_err(|e| ProviderError::invalid_response(format!("http client: {e}")))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            action,
            self.config.api_key
        )
    }

    /// Send a request and return the parsed success body, folding transport
    /// and HTTP failures into `ProviderError`.
    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        email: &str,
        body: serde_json::Value,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::network_with_source("request failed", e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::invalid_response(format!("body: {e}")));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if status.is_server_error() {
            return Err(ProviderError::unavailable(format!("http {status}")));
        }

        // 4xx: the API reports the cause as an error code string.
        let code = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.error.message)
            .unwrap_or_default();

        Err(map_api_error(&code, email))
    }
}

/// Map an identity-toolkit error code onto the provider taxonomy.
fn map_api_error(code: &str, email: &str) -> ProviderError {
    // Codes may carry a suffix, e.g. "TOO_MANY_ATTEMPTS_TRY_LATER : ...".
    let code = code.split(':').next().unwrap_or(code).trim();
    match code {
        "EMAIL_EXISTS" => ProviderError::already_exists(email),
        "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            ProviderError::invalid_credential(email)
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => ProviderError::RateLimited,
        "" => ProviderError::other("provider returned an unlabelled error"),
        other => ProviderError::other(format!("provider error code {other}")),
    }
}

#[async_trait]
impl CredentialProvider for RestCredentialProvider {
    async fn create_credential(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        debug!(email = %email, "creating credential");
        let account: AccountResponse = self
            .post(
                "signUp",
                email,
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        Ok(Identity::new(
            account.local_id,
            account.email.unwrap_or_else(|| email.to_string()),
        ))
    }

    async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        debug!(email = %email, "signing in");
        let account: AccountResponse = self
            .post(
                "signInWithPassword",
                email,
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        Ok(Identity::new(
            account.local_id,
            account.email.unwrap_or_else(|| email.to_string()),
        ))
    }

    async fn list_methods_for_email(&self, email: &str) -> ProviderResult<HashSet<SignInMethod>> {
        let response: AuthUriResponse = self
            .post(
                "createAuthUri",
                email,
                json!({
                    "identifier": email,
                    "continueUri": "http://localhost",
                }),
            )
            .await
            .map_err(|e| {
                warn!(email = %email, code = e.error_code(), "method lookup failed");
                e
            })?;

        Ok(response
            .signin_methods
            .iter()
            .map(|m| SignInMethod::from_wire(m))
            .collect())
    }
}
