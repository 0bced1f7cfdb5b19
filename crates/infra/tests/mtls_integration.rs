//! Integration tests for mutual-TLS settings on facade calls
//!
//! **Coverage:**
//! - Missing certificate files fail with `Transport(Tls)` before any request
//! - Complete settings route calls through the identity client
//! - Key material is re-read on every call
//! - Incomplete settings fall back to the plain client
//!
//! **Infrastructure:**
//! - WireMock HTTP server (the identity is only presented on TLS handshakes,
//!   so plain HTTP still reaches the mock)
//! - Fixture certificate and keys copied into a temp directory

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::path::{Path, PathBuf};

use bankly_domain::{BanklyError, TransportErrorKind};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::bankly_with_cached_token;

const PASSPHRASE: &str = "s3cret";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn copy_fixture(dir: &TempDir, name: &str, as_name: &str) -> PathBuf {
    let target = dir.path().join(as_name);
    std::fs::copy(fixture(name), &target).expect("Failed to copy fixture");
    target
}

async fn mount_balance(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 10})))
        .mount(server)
        .await;
}

/// Validates unreadable certificate files abort the call locally.
///
/// Assertions:
/// - error is `Transport` with kind `Tls`
/// - the server receives no request
/// - no token exchange happens
#[tokio::test]
async fn test_missing_certificate_files_fail_before_sending() {
    let server = MockServer::start().await;
    mount_balance(&server).await;

    let (bankly, exchange) = bankly_with_cached_token(&server);
    bankly
        .set_cert_path("/nonexistent/client.crt")
        .set_key_path("/nonexistent/client.key")
        .set_passphrase(PASSPHRASE);

    let err = bankly.get_balance("0001", "1").await.unwrap_err();

    assert!(matches!(err, BanklyError::Transport { kind: TransportErrorKind::Tls, .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(exchange.calls(), 0);
}

/// Validates complete settings load the identity and key changes are seen
/// on the next call.
///
/// Assertions:
/// - call succeeds with the encrypted fixture key
/// - a corrupted key file fails the next call with `Tls`
/// - restoring a valid key makes calls succeed again
#[tokio::test]
async fn test_calls_use_identity_read_at_call_time() {
    let server = MockServer::start().await;
    mount_balance(&server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let cert = copy_fixture(&dir, "client.crt", "client.crt");
    let key = copy_fixture(&dir, "client.key.enc.pem", "client.key");

    let (bankly, _) = bankly_with_cached_token(&server);
    bankly.set_cert_path(&cert).set_key_path(&key).set_passphrase(PASSPHRASE);
    assert!(bankly.mtls().is_complete());

    let balance = bankly.get_balance("0001", "1").await.unwrap();
    assert_eq!(balance, json!({"balance": 10}));

    std::fs::write(&key, "garbage").unwrap();
    let err = bankly.get_balance("0001", "1").await.unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::Tls));

    std::fs::copy(fixture("client.key.legacy.pem"), &key).unwrap();
    assert!(bankly.get_balance("0001", "1").await.is_ok());

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

/// Validates that mTLS only applies when all three settings are present.
///
/// Assertions:
/// - cert and key without passphrase use the plain client
#[tokio::test]
async fn test_incomplete_settings_use_plain_client() {
    let server = MockServer::start().await;
    mount_balance(&server).await;

    let (bankly, _) = bankly_with_cached_token(&server);
    bankly.set_cert_path("/nonexistent/client.crt").set_key_path("/nonexistent/client.key");

    assert!(!bankly.mtls().is_complete());
    assert!(bankly.get_balance("0001", "1").await.is_ok());
}
