//! Configuration management

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_URL, DEFAULT_API_VERSION, DEFAULT_LOGIN_URL};

/// Client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanklyConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub mtls: MtlsConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Keep `x-bkly-pix-user-id` on the client after a PIX call sets it
    #[serde(default)]
    pub sticky_pix_user_header: bool,
}

/// Client-credentials configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token host; `/connect/token` is appended
    #[serde(default = "default_login_url")]
    pub login_url: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    #[serde(default)]
    pub scope: Option<String>,
    /// Treat tokens as expired this many seconds early
    #[serde(default)]
    pub expiry_margin_secs: i64,
}

/// Mutual-TLS client certificate material
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MtlsConfig {
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    #[serde(default, skip_serializing)]
    pub passphrase: Option<String>,
}

impl MtlsConfig {
    /// mTLS applies only when certificate, key and passphrase are all set
    pub fn is_complete(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some() && self.passphrase.is_some()
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            sticky_pix_user_header: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            client_id: String::new(),
            client_secret: String::new(),
            scope: None,
            expiry_margin_secs: 0,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("login_url", &self.login_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("expiry_margin_secs", &self.expiry_margin_secs)
            .finish()
    }
}

impl fmt::Debug for MtlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MtlsConfig")
            .field("cert_path", &self.cert_path)
            .field("key_path", &self.key_path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
