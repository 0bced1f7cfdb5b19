//! Conversions from external infrastructure errors into domain errors.

use std::error::Error as StdError;

use bankly_common::auth::CredentialError;
use bankly_domain::{BanklyError, TransportErrorKind};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BanklyError);

impl From<InfraError> for BanklyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BanklyError> for InfraError {
    fn from(value: BanklyError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBanklyError {
    fn into_bankly(self) -> BanklyError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BanklyError */
/* -------------------------------------------------------------------------- */

fn is_rustls_error(cause: &(dyn StdError + 'static)) -> bool {
    if cause.is::<rustls::Error>() {
        return true;
    }
    // I/O errors hide their payload from `source()`
    cause
        .downcast_ref::<std::io::Error>()
        .and_then(std::io::Error::get_ref)
        .is_some_and(|inner| is_rustls_error(inner))
}

/// Whether any error in the source chain comes from the TLS layer
fn caused_by_tls(err: &HttpError) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if is_rustls_error(cause) {
            return true;
        }
        source = cause.source();
    }
    false
}

impl IntoBanklyError for HttpError {
    fn into_bankly(self) -> BanklyError {
        let kind = if self.is_timeout() {
            TransportErrorKind::Timeout
        } else if caused_by_tls(&self) {
            TransportErrorKind::Tls
        } else if self.is_connect() {
            TransportErrorKind::Connect
        } else if self.is_decode() || self.is_body() {
            TransportErrorKind::Decode
        } else {
            TransportErrorKind::Request
        };

        let message = match self.url() {
            Some(url) => format!("{} ({})", self, url.path()),
            None => self.to_string(),
        };

        BanklyError::transport(kind, message)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bankly())
    }
}

/* -------------------------------------------------------------------------- */
/* CredentialError → BanklyError */
/* -------------------------------------------------------------------------- */

impl IntoBanklyError for CredentialError {
    fn into_bankly(self) -> BanklyError {
        BanklyError::Authentication(self.to_string())
    }
}

impl From<CredentialError> for InfraError {
    fn from(value: CredentialError) -> Self {
        InfraError(value.into_bankly())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn credential_errors_map_to_authentication() {
        let err = CredentialError::Malformed("missing access_token".into());
        let mapped: BanklyError = InfraError::from(err).into();
        match mapped {
            BanklyError::Authentication(msg) => assert!(msg.contains("missing access_token")),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}/account/balance")).send().await.unwrap_err();

        let mapped: BanklyError = InfraError::from(error).into();
        assert_eq!(mapped.transport_kind(), Some(TransportErrorKind::Connect));
    }

    #[tokio::test]
    async fn failed_handshake_maps_to_tls() {
        let server = MockServer::start().await;
        let url = server.uri().replacen("http://", "https://", 1);

        let client = Client::builder().no_proxy().use_rustls_tls().build().unwrap();
        let error = client.get(url).send().await.unwrap_err();

        let mapped: BanklyError = InfraError::from(error).into();
        assert_eq!(mapped.transport_kind(), Some(TransportErrorKind::Tls));
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        let mapped: BanklyError = InfraError::from(error).into();
        assert_eq!(mapped.transport_kind(), Some(TransportErrorKind::Timeout));
    }

    #[tokio::test]
    async fn invalid_json_maps_to_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client
            .get(server.uri())
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();

        let mapped: BanklyError = InfraError::from(error).into();
        assert_eq!(mapped.transport_kind(), Some(TransportErrorKind::Decode));
    }
}
