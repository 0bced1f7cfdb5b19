//! Outbound request assembly
//!
//! A [`RequestSpec`] names what to call; [`RequestSpec::build`] turns it into
//! an [`OutboundRequest`] with the final URL and the merged header list:
//!
//! ```text
//! api-version ─┐
//! client-wide ─┼─► merged headers (later entries replace earlier ones,
//! correlation ─┤                   names compared case-insensitively)
//! per-call ────┘
//! ```
//!
//! [`OutboundRequest::prepare`] then encodes headers and body, and the bearer
//! token is attached last, in [`PreparedRequest::into_request`].

use bankly_domain::constants::{
    is_correlation_exempt, API_VERSION_HEADER, CORRELATION_ID_HEADER, PIX_USER_ID_HEADER,
};
use bankly_domain::{BanklyError, MultipartBody, TransportErrorKind, ValidationError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::multipart::build_form;
use crate::http::HttpClient;

/// Ordered header list; names are compared case-insensitively
pub type HeaderList = Vec<(String, String)>;

/// Body encoding of one call
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(MultipartBody),
}

/// Per-call knobs supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Sent verbatim as `x-correlation-id`, even on exempt endpoints
    pub correlation_id: Option<String>,
    /// Win over client-wide headers on collision
    pub headers: HeaderList,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying an optional caller-supplied correlation id
    pub fn correlated(correlation_id: Option<&str>) -> Self {
        Self { correlation_id: correlation_id.map(str::to_string), headers: Vec::new() }
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add `x-bkly-pix-user-id`
    pub fn pix_user(self, document: impl Into<String>) -> Self {
        self.header(PIX_USER_ID_HEADER, document)
    }
}

/// Correlation id for a call to `path`
///
/// A caller-supplied id always wins. Otherwise non-exempt endpoints get a
/// fresh UUID v4 and exempt ones get none.
pub fn correlation_id_for(path: &str, supplied: Option<&str>) -> Option<String> {
    match supplied {
        Some(id) => Some(id.to_string()),
        None if is_correlation_exempt(path) => None,
        None => Some(Uuid::new_v4().to_string()),
    }
}

/// Apply `overrides` on top of `base`
///
/// A header already present keeps its position and takes the new value; new
/// headers are appended.
pub fn merge_headers(base: &[(String, String)], overrides: &[(String, String)]) -> HeaderList {
    let mut merged = base.to_vec();
    for (name, value) in overrides {
        match merged.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1.clone_from(value),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

/// Description of one API call before it is bound to a client
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub options: CallOptions,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            options: CallOptions::default(),
        }
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the URL and headers against a client's settings
    ///
    /// # Errors
    /// Returns a transport error if `base_url` and `path` do not form a URL.
    pub fn build(
        self,
        base_url: &Url,
        api_version: &str,
        client_headers: &[(String, String)],
    ) -> Result<OutboundRequest, BanklyError> {
        let url = join_url(base_url, &self.path, &self.query)?;
        let correlation_id =
            correlation_id_for(&self.path, self.options.correlation_id.as_deref());

        let mut headers = merge_headers(
            &[(API_VERSION_HEADER.to_string(), api_version.to_string())],
            client_headers,
        );
        if let Some(id) = &correlation_id {
            headers = merge_headers(&headers, &[(CORRELATION_ID_HEADER.to_string(), id.clone())]);
        }
        headers = merge_headers(&headers, &self.options.headers);

        Ok(OutboundRequest { method: self.method, url, headers, body: self.body, correlation_id })
    }
}

fn join_url(base: &Url, path: &str, query: &[(String, String)]) -> Result<Url, BanklyError> {
    let raw = format!("{}{}", base.as_str().trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| {
        BanklyError::transport(TransportErrorKind::Request, format!("invalid request URL {raw}: {e}"))
    })?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Fully resolved call, ready to be bound to a transport
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderList,
    pub body: RequestBody,
    pub correlation_id: Option<String>,
}

impl OutboundRequest {
    /// Value of a header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Encode headers and body, checking everything that could fail
    ///
    /// Runs before any token is fetched so a bad header or attachment never
    /// costs a network round trip.
    ///
    /// # Errors
    /// Returns a validation error for header names or values that cannot be
    /// sent, or for an unusable multipart file.
    pub fn prepare(self) -> Result<PreparedRequest, BanklyError> {
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ValidationError::field("headers", format!("invalid header name: {name}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ValidationError::field(name.clone(), "invalid header value"))?;
            headers.insert(header_name, header_value);
        }

        let body = match self.body {
            RequestBody::Empty => EncodedBody::Empty,
            RequestBody::Json(value) => EncodedBody::Json(value),
            RequestBody::Form(pairs) => EncodedBody::Form(pairs),
            RequestBody::Multipart(body) => EncodedBody::Multipart(build_form(body)?),
        };

        Ok(PreparedRequest { method: self.method, url: self.url, headers, body })
    }
}

enum EncodedBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(Form),
}

/// Request with validated headers and an encoded body, waiting for a token
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: EncodedBody,
}

impl PreparedRequest {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Bind to `client`, authenticating with `token`
    pub fn into_request(self, client: &HttpClient, token: &str) -> RequestBuilder {
        let builder = client.request(self.method, self.url).headers(self.headers).bearer_auth(token);

        match self.body {
            EncodedBody::Empty => builder,
            EncodedBody::Json(value) => builder.json(&value),
            EncodedBody::Form(pairs) => builder.form(&pairs),
            EncodedBody::Multipart(form) => builder.multipart(form),
        }
    }
}

impl std::fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.sandbox.bankly.com.br/").unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> HeaderList {
        items.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_fresh_uuid_for_regular_endpoints() {
        let first = correlation_id_for("/account/balance", None).unwrap();
        let second = correlation_id_for("/account/balance", None).unwrap();

        let parsed = Uuid::parse_str(&first).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(first, second);
    }

    #[test]
    fn test_exempt_endpoints_get_no_generated_id() {
        assert_eq!(correlation_id_for("/banklist", None), None);
        assert_eq!(correlation_id_for("/connect/token", None), None);
        assert_eq!(correlation_id_for("/banklist", Some("mine")), Some("mine".into()));
    }

    #[test]
    fn test_per_call_headers_win() {
        let merged = merge_headers(
            &pairs(&[("api-version", "1"), ("x-bkly-pix-user-id", "111")]),
            &pairs(&[("X-Bkly-Pix-User-Id", "222"), ("x-extra", "y")]),
        );
        assert_eq!(merged, pairs(&[("api-version", "1"), ("x-bkly-pix-user-id", "222"), ("x-extra", "y")]));
    }

    #[test]
    fn test_build_resolves_url_and_headers() {
        let spec = RequestSpec::new(Method::GET, "/banklist")
            .query(vec![("product".into(), "None".into())]);
        let outbound = spec.build(&base(), "1", &[]).unwrap();

        assert_eq!(outbound.url.as_str(), "https://api.sandbox.bankly.com.br/banklist?product=None");
        assert_eq!(outbound.header("api-version"), Some("1"));
        assert_eq!(outbound.header("x-correlation-id"), None);
    }

    #[test]
    fn test_build_without_query_has_no_question_mark() {
        let outbound = RequestSpec::new(Method::GET, "/customers/123/accounts")
            .build(&base(), "1", &[])
            .unwrap();
        assert_eq!(outbound.url.query(), None);
        assert!(outbound.correlation_id.is_some());
    }

    #[test]
    fn test_client_headers_then_call_overrides() {
        let client_headers = pairs(&[("api-version", "2"), ("x-bkly-pix-user-id", "old")]);
        let options = CallOptions::correlated(Some("corr-1")).pix_user("new");
        let outbound = RequestSpec::new(Method::POST, "/pix/qrcodes/decode")
            .options(options)
            .build(&base(), "1", &client_headers)
            .unwrap();

        assert_eq!(outbound.header("api-version"), Some("2"));
        assert_eq!(outbound.header("x-bkly-pix-user-id"), Some("new"));
        assert_eq!(outbound.header("x-correlation-id"), Some("corr-1"));
    }

    #[test]
    fn test_prepare_rejects_unsendable_header_value() {
        let options = CallOptions::new().pix_user("123\n456");
        let err = RequestSpec::new(Method::GET, "/pix/entries/key")
            .options(options)
            .build(&base(), "1", &[])
            .unwrap()
            .prepare()
            .unwrap_err();

        assert!(matches!(err, BanklyError::Validation(_)));
    }

    #[test]
    fn test_prepare_keeps_merged_headers() {
        let prepared = RequestSpec::new(Method::GET, "/account/balance")
            .options(CallOptions::correlated(Some("corr-9")))
            .build(&base(), "1", &[])
            .unwrap()
            .prepare()
            .unwrap();

        assert_eq!(prepared.headers().get("x-correlation-id").unwrap(), "corr-9");
        assert_eq!(prepared.headers().get("api-version").unwrap(), "1");
    }
}
