//! HTTP transport
//!
//! A thin wrapper over reqwest with a single attempt per call, plus the
//! mTLS identity loader and the pool that reuses one client per certificate
//! configuration.

pub mod client;
pub mod mtls;

pub use client::{HttpClient, HttpClientBuilder};
pub use mtls::{decrypt_private_key, load_identity, ClientPool, HttpSettings};
