//! Shared helpers for infra integration tests

use std::sync::Arc;

use bankly_common::auth::InMemoryCredentialStore;
use bankly_common::testing::{seeded_store, MockTokenExchange};
use bankly_domain::BanklyConfig;
use bankly_infra::{Bankly, BanklyBuilder};
use wiremock::MockServer;

/// Config pointing both the API and the login host at `server`
pub fn config_for(server: &MockServer) -> BanklyConfig {
    let mut config = BanklyConfig::default();
    config.api.base_url = server.uri();
    config.auth.login_url = server.uri();
    config.auth.client_id = "client-id".to_string();
    config.auth.client_secret = "client-secret".to_string();
    config
}

/// Builder with an isolated credential store so tests never share tokens
pub fn builder_for(server: &MockServer) -> BanklyBuilder {
    Bankly::builder(config_for(server)).credential_store(Arc::new(InMemoryCredentialStore::new()))
}

/// Client authenticated with a cached, valid token `cached-token`
pub fn bankly_with_cached_token(server: &MockServer) -> (Bankly, MockTokenExchange) {
    let exchange = MockTokenExchange::new();
    let bankly = Bankly::builder(config_for(server))
        .credential_store(seeded_store("cached-token", 3600))
        .token_exchange(Arc::new(exchange.clone()))
        .build()
        .expect("client should build");
    (bankly, exchange)
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
}
