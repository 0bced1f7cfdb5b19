//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationError;

/// Network-level failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// The transport timeout elapsed
    Timeout,
    /// DNS resolution or TCP connect failed
    Connect,
    /// TLS handshake or client certificate material failed
    Tls,
    /// The response body could not be read or decoded
    Decode,
    /// The request could not be built or sent
    Request,
}

/// Coarse error classes for callers that only branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Payload rejected locally, nothing was sent
    Validation,
    /// No bearer token could be obtained
    Authentication,
    /// The bank could not be reached
    Transport,
    /// The bank answered with a non-success status
    Api,
    /// The client was built with unusable settings
    Config,
}

/// Main error type for Bankly operations
#[derive(Error, Debug)]
pub enum BanklyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Transport error ({kind:?}): {message}")]
    Transport { kind: TransportErrorKind, message: String },

    #[error("API request failed with status {status}: {raw_body}")]
    ApiRequest {
        /// HTTP status code returned by the bank
        status: u16,
        /// Parsed JSON body, or the raw text as a JSON string when not JSON
        body: Value,
        /// Body exactly as received
        raw_body: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BanklyError {
    /// Build a transport error
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport { kind, message: message.into() }
    }

    /// Build an API error from a status and the verbatim response text
    pub fn api_request(status: u16, raw_body: impl Into<String>) -> Self {
        let raw_body = raw_body.into();
        let body = if raw_body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw_body).unwrap_or_else(|_| Value::String(raw_body.clone()))
        };
        Self::ApiRequest { status, body, raw_body }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::ApiRequest { .. } => ErrorCategory::Api,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiRequest { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed body of an API error
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::ApiRequest { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Transport kind of a transport error
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias for Bankly operations
pub type Result<T> = std::result::Result<T, BanklyError>;
