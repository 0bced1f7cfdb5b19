//! Bankly API facade
//!
//! [`Bankly`] exposes one method per API operation. Each method validates its
//! payload, picks the verb and path, and hands the call to the shared
//! [`ApiClient`]. Operations are grouped by area:
//!
//! - `accounts`: bank list, balance, account data, statements, events, closure
//! - `transfers`: fund transfers
//! - `customers`: onboarding, document analysis, customer accounts
//! - `billets`: bill payments and bank slips
//! - `pix`: addressing keys, cash-out, QR codes
//! - `holders`: webhook messages and holder limits
//!
//! # Usage Example
//!
//! ```no_run
//! use bankly_infra::bankly::Bankly;
//!
//! # async fn example() -> Result<(), bankly_domain::BanklyError> {
//! let bankly = Bankly::from_env()?;
//! let balance = bankly.get_balance("0001", "1234567").await?;
//! println!("{balance}");
//! # Ok(())
//! # }
//! ```

mod accounts;
mod billets;
mod customers;
mod holders;
mod pix;
mod transfers;

use std::path::PathBuf;
use std::sync::Arc;

use bankly_common::auth::{CredentialManager, CredentialStore, TokenExchange};
use bankly_domain::constants::PIX_USER_ID_HEADER;
use bankly_domain::{BanklyConfig, MtlsConfig, Payload, Result};
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::{
    AccessTokenProvider, ApiClient, ApiClientConfig, CallOptions, ClientCredentialsExchange,
    HeaderList, ManagedTokenProvider, RequestBody, UnconfiguredTokenProvider,
};
use crate::config;
use crate::http::ClientPool;

/// Client for the Bankly banking-as-a-service API
#[derive(Debug)]
pub struct Bankly {
    client: ApiClient,
    sticky_pix_user_header: bool,
}

impl Bankly {
    /// Build a client from `config` with the process-wide credential store
    ///
    /// # Errors
    ///
    /// Returns `Config` if the base URL is invalid or the HTTP client cannot
    /// be created
    pub fn new(config: BanklyConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: BanklyConfig) -> BanklyBuilder {
        BanklyBuilder::new(config)
    }

    /// Build a client from `BANKLY_*` variables or a config file
    ///
    /// # Errors
    ///
    /// Returns `Config` if no usable configuration is found
    pub fn from_env() -> Result<Self> {
        Self::new(config::load()?)
    }

    /// Use `token` for every later call; it is never refreshed
    pub fn set_token(&self, token: impl Into<String>) {
        self.client.set_token(token);
    }

    pub fn token(&self) -> Option<String> {
        self.client.token()
    }

    pub fn set_passphrase(&self, passphrase: impl Into<String>) -> &Self {
        let passphrase = passphrase.into();
        self.client.update_mtls(|mtls| mtls.passphrase = Some(passphrase));
        self
    }

    pub fn set_cert_path(&self, path: impl Into<PathBuf>) -> &Self {
        let path = path.into();
        self.client.update_mtls(|mtls| mtls.cert_path = Some(path));
        self
    }

    pub fn set_key_path(&self, path: impl Into<PathBuf>) -> &Self {
        let path = path.into();
        self.client.update_mtls(|mtls| mtls.key_path = Some(path));
        self
    }

    /// Current mTLS settings of API calls
    pub fn mtls(&self) -> MtlsConfig {
        self.client.mtls()
    }

    /// Merge `headers` into the headers sent on every later call
    pub fn set_headers(&self, headers: &[(String, String)]) -> &Self {
        self.client.set_headers(headers);
        self
    }

    pub fn headers(&self) -> HeaderList {
        self.client.headers()
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.client
    }

    /// Call options carrying `x-bkly-pix-user-id`
    ///
    /// With sticky PIX headers enabled the value is also kept on the client.
    fn pix_user_options(&self, document: &str) -> CallOptions {
        if self.sticky_pix_user_header {
            self.client.set_headers(&[(PIX_USER_ID_HEADER.to_string(), document.to_string())]);
        }
        CallOptions::new().pix_user(document)
    }
}

/// Validate `payload` and wrap it as a JSON body
fn json_body<P: Payload + ?Sized>(payload: &P) -> Result<RequestBody> {
    Ok(RequestBody::Json(payload.to_body()?))
}

/// Query pairs from string slices
fn pairs<const N: usize>(items: [(&str, &str); N]) -> Vec<(String, String)> {
    items.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Builder for [`Bankly`]
pub struct BanklyBuilder {
    config: BanklyConfig,
    store: Option<Arc<dyn CredentialStore>>,
    refresh_lock: Option<Arc<Mutex<()>>>,
    exchange: Option<Arc<dyn TokenExchange>>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
    token: Option<String>,
}

impl BanklyBuilder {
    pub fn new(config: BanklyConfig) -> Self {
        Self { config, store: None, refresh_lock: None, exchange: None, token_provider: None, token: None }
    }

    /// Cache credentials in `store` instead of the process-wide store
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Share a refresh lock with other clients using the same store
    pub fn refresh_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.refresh_lock = Some(lock);
        self
    }

    /// Obtain credentials from `exchange` instead of the login host
    pub fn token_exchange(mut self, exchange: Arc<dyn TokenExchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Bypass the credential manager entirely
    pub fn token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Start with an explicit bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `Config` if the base URL is invalid or the HTTP client cannot
    /// be created
    pub fn build(self) -> Result<Bankly> {
        let api_config = ApiClientConfig::from(&self.config.api);
        let clients = Arc::new(ClientPool::new(api_config.http_settings())?);

        let provider = match self.token_provider {
            Some(provider) => provider,
            None => Self::managed_provider(
                &self.config,
                self.exchange,
                self.store,
                self.refresh_lock,
                Arc::clone(&clients),
            ),
        };

        let client = ApiClient::with_pool(api_config, provider, clients)?;
        let mtls = self.config.mtls.clone();
        client.update_mtls(|current| *current = mtls);
        if let Some(token) = self.token {
            client.set_token(token);
        }

        debug!(base_url = %self.config.api.base_url, "Bankly client ready");
        Ok(Bankly { client, sticky_pix_user_header: self.config.api.sticky_pix_user_header })
    }

    fn managed_provider(
        config: &BanklyConfig,
        exchange: Option<Arc<dyn TokenExchange>>,
        store: Option<Arc<dyn CredentialStore>>,
        refresh_lock: Option<Arc<Mutex<()>>>,
        clients: Arc<ClientPool>,
    ) -> Arc<dyn AccessTokenProvider> {
        let exchange: Arc<dyn TokenExchange> = match exchange {
            Some(exchange) => exchange,
            None if config.auth.client_id.is_empty() || config.auth.client_secret.is_empty() => {
                return Arc::new(UnconfiguredTokenProvider);
            }
            None => {
                let exchange = ClientCredentialsExchange::new(&config.auth, clients);
                if config.mtls.is_complete() {
                    Arc::new(exchange.with_mtls(config.mtls.clone()))
                } else {
                    Arc::new(exchange)
                }
            }
        };

        let manager = match store {
            Some(store) => {
                let manager = CredentialManager::new(exchange, store);
                match refresh_lock {
                    Some(lock) => manager.refresh_lock(lock),
                    None => manager,
                }
            }
            None => CredentialManager::with_process_store(exchange),
        };

        Arc::new(ManagedTokenProvider::new(manager.expiry_margin(config.auth.expiry_margin_secs)))
    }
}

impl std::fmt::Debug for BanklyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BanklyBuilder")
            .field("config", &self.config)
            .field("custom_store", &self.store.is_some())
            .field("custom_exchange", &self.exchange.is_some())
            .field("custom_provider", &self.token_provider.is_some())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use bankly_common::auth::InMemoryCredentialStore;
    use bankly_common::testing::MockTokenExchange;
    use bankly_domain::BanklyError;

    use super::*;

    fn config() -> BanklyConfig {
        let mut config = BanklyConfig::default();
        config.api.base_url = "http://127.0.0.1:9".into();
        config
    }

    #[test]
    fn test_mtls_setters_fill_client_settings() {
        let bankly = Bankly::new(config()).unwrap();
        bankly.set_cert_path("/certs/client.crt").set_key_path("/certs/client.key");
        assert!(!bankly.mtls().is_complete());

        bankly.set_passphrase("s3cret");
        assert!(bankly.mtls().is_complete());
    }

    #[test]
    fn test_builder_token_is_explicit() {
        let bankly = Bankly::builder(config()).token("manual").build().unwrap();
        assert_eq!(bankly.token().as_deref(), Some("manual"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_as_authentication() {
        let bankly = Bankly::new(config()).unwrap();
        let err = bankly.get_balance("0001", "1").await.unwrap_err();
        assert!(matches!(err, BanklyError::Authentication(_)));
    }

    #[test]
    fn test_sticky_pix_header_is_kept_on_client() {
        let mut sticky = config();
        sticky.api.sticky_pix_user_header = true;
        let bankly = Bankly::builder(sticky)
            .token_exchange(Arc::new(MockTokenExchange::new()))
            .credential_store(Arc::new(InMemoryCredentialStore::new()))
            .build()
            .unwrap();

        let options = bankly.pix_user_options("12345678909");
        assert_eq!(options.headers, vec![(PIX_USER_ID_HEADER.to_string(), "12345678909".to_string())]);
        assert_eq!(bankly.headers(), options.headers);
    }

    #[test]
    fn test_pix_header_is_per_call_by_default() {
        let bankly = Bankly::new(config()).unwrap();
        let options = bankly.pix_user_options("12345678909");
        assert_eq!(options.headers.len(), 1);
        assert!(bankly.headers().is_empty());
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let mut bad = config();
        bad.api.base_url = "not a url".into();
        assert!(matches!(Bankly::new(bad), Err(BanklyError::Config(_))));
    }
}
