//! Session credential lifecycle
//!
//! Every API call is authenticated with a bearer token obtained through a
//! client-credentials exchange. This module owns that token: it caches it with
//! an expiry watermark and re-acquires it when it is absent or expired.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  CredentialManager  │  check → lock → re-check → exchange → store
//! └─────────┬───────────┘
//!           │
//!           ├──► CredentialStore  (InMemoryCredentialStore, process_store())
//!           │
//!           └──► TokenExchange    (HTTP client-credentials, provided by infra)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bankly_common::auth::{CredentialManager, InMemoryCredentialStore, TokenExchange};
//!
//! # async fn example(exchange: Arc<dyn TokenExchange>) -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryCredentialStore::new());
//! let manager = CredentialManager::new(exchange, store);
//!
//! // Exchanges on first use, then serves the cached token until it expires.
//! let token = manager.valid_token().await?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```

mod store;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use store::{process_refresh_lock, process_store, InMemoryCredentialStore};
pub use token_manager::{CredentialError, CredentialManager, DEFAULT_EXPIRY_MARGIN_SECONDS};
pub use traits::{CredentialStore, TokenExchange};
pub use types::{Credential, TokenResponse};
