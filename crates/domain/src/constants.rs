//! Protocol constants
//!
//! Header names, defaults and the correlation-id exemption list shared by the
//! request builder and the facade.

// Endpoints
pub const DEFAULT_API_URL: &str = "https://api.sandbox.bankly.com.br";
pub const DEFAULT_LOGIN_URL: &str = "https://login.sandbox.bankly.com.br";
pub const TOKEN_ENDPOINT: &str = "/connect/token";
pub const BANK_LIST_ENDPOINT: &str = "/banklist";

// Headers
pub const API_VERSION_HEADER: &str = "api-version";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const PIX_USER_ID_HEADER: &str = "x-bkly-pix-user-id";
pub const DEFAULT_API_VERSION: &str = "1";

/// Endpoints that never receive a generated correlation id
pub const CORRELATION_EXEMPT_ENDPOINTS: [&str; 2] = [BANK_LIST_ENDPOINT, TOKEN_ENDPOINT];

/// Whether `path` is exempt from correlation-id generation.
///
/// Matching is exact on the path without query string.
pub fn is_correlation_exempt(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    CORRELATION_EXEMPT_ENDPOINTS.contains(&path)
}

// Defaults used by facade operations
pub const DEFAULT_BANK_LIST_PRODUCT: &str = "None";
pub const DEFAULT_RESULT_LEVEL: &str = "DETAILED";
pub const DEFAULT_DOCUMENT_RESULT_LEVEL: &str = "ONLY_STATUS";
pub const DEFAULT_CLOSURE_REASON: &str = "HOLDER_REQUEST";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exempt_endpoints() {
        assert!(is_correlation_exempt("/banklist"));
        assert!(is_correlation_exempt("/connect/token"));
        assert!(is_correlation_exempt("/banklist?product=None"));
        assert!(!is_correlation_exempt("/banklist/001"));
        assert!(!is_correlation_exempt("/fund-transfers"));
    }
}
