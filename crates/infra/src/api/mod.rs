//! Request orchestration for the Bankly API
//!
//! This module turns a typed call into an authenticated, correlation-tracked
//! HTTP request and maps the answer into JSON or a [`bankly_domain::BanklyError`].
//!
//! # Architecture
//!
//! - `auth`: bearer token sources (client-credentials exchange, managed cache)
//! - `request`: URL, header merge and correlation id policy
//! - `multipart`: document upload encoding
//! - `client`: verb dispatchers, one network call each, no retries

pub mod auth;
pub mod client;
pub mod multipart;
pub mod request;

pub use auth::{
    AccessTokenProvider, ClientCredentialsExchange, ManagedTokenProvider, UnconfiguredTokenProvider,
};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig, RawResponse};
pub use request::{
    correlation_id_for, merge_headers, CallOptions, HeaderList, OutboundRequest, RequestBody,
    RequestSpec,
};
