//! Bearer token acquisition
//!
//! [`ClientCredentialsExchange`] performs the OAuth client-credentials grant
//! against the login host. [`ManagedTokenProvider`] puts a
//! [`CredentialManager`] in front of it so the token is cached and refreshed
//! once per expiry, no matter how many calls race for it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bankly_common::auth::{Credential, CredentialError, CredentialManager, TokenExchange, TokenResponse};
use bankly_domain::constants::TOKEN_ENDPOINT;
use bankly_domain::{AuthConfig, BanklyError, MtlsConfig};
use reqwest::Method;
use tracing::{debug, warn};

use crate::errors::InfraError;
use crate::http::ClientPool;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String, BanklyError>;
}

/// OAuth client-credentials grant over HTTP
pub struct ClientCredentialsExchange {
    clients: Arc<ClientPool>,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: Option<String>,
    mtls: MtlsConfig,
}

impl ClientCredentialsExchange {
    /// Exchange against `{login_url}/connect/token`
    pub fn new(auth: &AuthConfig, clients: Arc<ClientPool>) -> Self {
        Self {
            clients,
            token_url: format!("{}{}", auth.login_url.trim_end_matches('/'), TOKEN_ENDPOINT),
            client_id: auth.client_id.clone(),
            client_secret: auth.client_secret.clone(),
            scope: auth.scope.clone(),
            mtls: MtlsConfig::default(),
        }
    }

    /// Present this client certificate to the login host
    pub fn with_mtls(mut self, mtls: MtlsConfig) -> Self {
        self.mtls = mtls;
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if let Some(scope) = &self.scope {
            form.push(("scope", scope.as_str()));
        }
        form
    }
}

impl fmt::Debug for ClientCredentialsExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsExchange")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("mtls", &self.mtls)
            .finish()
    }
}

#[async_trait]
impl TokenExchange for ClientCredentialsExchange {
    async fn exchange(&self) -> Result<Credential, CredentialError> {
        let client =
            self.clients.client_for(&self.mtls).map_err(|e| CredentialError::Exchange(e.to_string()))?;

        debug!(url = %self.token_url, client_id = %self.client_id, "requesting access token");
        let request = client.request(Method::POST, &self.token_url).form(&self.form());
        let response =
            client.send(request).await.map_err(|e| CredentialError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "token endpoint rejected the client credentials");
            return Err(CredentialError::Exchange(format!(
                "token endpoint returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::Exchange(format!("undecodable token response: {e}")))?;

        Credential::from_response(token, chrono::Utc::now().timestamp())
    }
}

/// Token provider backed by a [`CredentialManager`]
#[derive(Debug)]
pub struct ManagedTokenProvider {
    manager: CredentialManager,
}

impl ManagedTokenProvider {
    pub fn new(manager: CredentialManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &CredentialManager {
        &self.manager
    }
}

#[async_trait]
impl AccessTokenProvider for ManagedTokenProvider {
    async fn access_token(&self) -> Result<String, BanklyError> {
        self.manager.valid_token().await.map_err(|e| InfraError::from(e).into())
    }
}

/// Token provider for clients built without client credentials
///
/// Such clients work only with an explicit token; every other call fails
/// before reaching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredTokenProvider;

#[async_trait]
impl AccessTokenProvider for UnconfiguredTokenProvider {
    async fn access_token(&self) -> Result<String, BanklyError> {
        Err(BanklyError::Authentication(
            "client credentials are not configured and no token was set".to_string(),
        ))
    }
}
