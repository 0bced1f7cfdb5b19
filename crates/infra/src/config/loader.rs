//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BANKLY_API_URL`: API base URL (required)
//! - `BANKLY_CLIENT_ID`: OAuth client id (required)
//! - `BANKLY_CLIENT_SECRET`: OAuth client secret (required)
//! - `BANKLY_LOGIN_URL`: Token host (default: sandbox login host)
//! - `BANKLY_SCOPE`: Space-separated OAuth scopes
//! - `BANKLY_API_VERSION`: `api-version` header value (default: `1`)
//! - `BANKLY_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
//! - `BANKLY_EXPIRY_MARGIN_SECS`: Refresh tokens this early (default: 0)
//! - `BANKLY_STICKY_PIX_USER_HEADER`: Keep the PIX user header on the client
//! - `BANKLY_MTLS_CERT_PATH`, `BANKLY_MTLS_KEY_PATH`,
//!   `BANKLY_MTLS_PASSPHRASE`: Client certificate material
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./bankly.json` or `./bankly.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use bankly_domain::constants::{DEFAULT_API_VERSION, DEFAULT_LOGIN_URL};
use bankly_domain::{ApiConfig, AuthConfig, BanklyConfig, BanklyError, MtlsConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["bankly.json", "bankly.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `BanklyError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<BanklyConfig> {
    // Try loading from environment first
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            // Fall back to file
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `BanklyError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<BanklyConfig> {
    let base_url = env_var("BANKLY_API_URL")?;
    let client_id = env_var("BANKLY_CLIENT_ID")?;
    let client_secret = env_var("BANKLY_CLIENT_SECRET")?;

    let api = ApiConfig {
        base_url,
        api_version: env_opt("BANKLY_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        timeout_secs: env_parse("BANKLY_TIMEOUT_SECS", 30)?,
        user_agent: env_opt("BANKLY_USER_AGENT"),
        sticky_pix_user_header: env_bool("BANKLY_STICKY_PIX_USER_HEADER", false),
    };

    let auth = AuthConfig {
        login_url: env_opt("BANKLY_LOGIN_URL").unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string()),
        client_id,
        client_secret,
        scope: env_opt("BANKLY_SCOPE"),
        expiry_margin_secs: env_parse("BANKLY_EXPIRY_MARGIN_SECS", 0)?,
    };

    let mtls = MtlsConfig {
        cert_path: env_opt("BANKLY_MTLS_CERT_PATH").map(PathBuf::from),
        key_path: env_opt("BANKLY_MTLS_KEY_PATH").map(PathBuf::from),
        passphrase: env_opt("BANKLY_MTLS_PASSPHRASE"),
    };

    Ok(BanklyConfig { api, auth, mtls })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BanklyError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<BanklyConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BanklyError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BanklyError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BanklyError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `BanklyError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<BanklyConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BanklyError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BanklyError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(BanklyError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `BanklyError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| BanklyError::Config(format!("Missing required environment variable: {}", key)))
}

/// Optional environment variable; empty values count as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| BanklyError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 8] = [
        "BANKLY_API_URL",
        "BANKLY_CLIENT_ID",
        "BANKLY_CLIENT_SECRET",
        "BANKLY_LOGIN_URL",
        "BANKLY_TIMEOUT_SECS",
        "BANKLY_MTLS_CERT_PATH",
        "BANKLY_MTLS_KEY_PATH",
        "BANKLY_MTLS_PASSPHRASE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_BANKLY_BOOL_ON", "on");
        std::env::set_var("TEST_BANKLY_BOOL_UPPER", "TRUE");
        std::env::set_var("TEST_BANKLY_BOOL_OFF", "no");

        assert!(env_bool("TEST_BANKLY_BOOL_ON", false));
        assert!(env_bool("TEST_BANKLY_BOOL_UPPER", false));
        assert!(!env_bool("TEST_BANKLY_BOOL_OFF", true));
        assert!(env_bool("TEST_BANKLY_BOOL_MISSING", true));

        std::env::remove_var("TEST_BANKLY_BOOL_ON");
        std::env::remove_var("TEST_BANKLY_BOOL_UPPER");
        std::env::remove_var("TEST_BANKLY_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BANKLY_API_URL", "https://api.example.test");
        std::env::set_var("BANKLY_CLIENT_ID", "id");
        std::env::set_var("BANKLY_CLIENT_SECRET", "secret");
        std::env::set_var("BANKLY_TIMEOUT_SECS", "5");
        std::env::set_var("BANKLY_MTLS_CERT_PATH", "/certs/client.crt");

        let config = load_from_env().unwrap();
        assert_eq!(config.api.base_url, "https://api.example.test");
        assert_eq!(config.api.api_version, "1");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.auth.login_url, DEFAULT_LOGIN_URL);
        assert_eq!(config.mtls.cert_path, Some(PathBuf::from("/certs/client.crt")));
        assert!(!config.mtls.is_complete());

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BANKLY_API_URL", "https://api.example.test");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, BanklyError::Config(ref msg) if msg.contains("BANKLY_CLIENT_ID")));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BANKLY_API_URL", "https://api.example.test");
        std::env::set_var("BANKLY_CLIENT_ID", "id");
        std::env::set_var("BANKLY_CLIENT_SECRET", "secret");
        std::env::set_var("BANKLY_TIMEOUT_SECS", "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, BanklyError::Config(ref msg) if msg.contains("BANKLY_TIMEOUT_SECS")));

        clear_env();
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{
            "api": { "base_url": "https://api.example.test" },
            "auth": { "client_id": "id", "client_secret": "secret" }
        }"#;

        let config = parse_config(json_content, &PathBuf::from("bankly.json")).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.auth.client_secret, "secret");
        assert_eq!(config.mtls, MtlsConfig::default());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[api]
base_url = "https://api.example.test"
api_version = "2"

[auth]
client_id = "id"
client_secret = "secret"
scope = "pix.read"

[mtls]
cert_path = "/certs/client.crt"
key_path = "/certs/client.key"
passphrase = "pass"
"#;

        let config = parse_config(toml_content, &PathBuf::from("bankly.toml")).unwrap();
        assert_eq!(config.api.api_version, "2");
        assert_eq!(config.auth.scope.as_deref(), Some("pix.read"));
        assert!(config.mtls.is_complete());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("bankly.yaml"));
        assert!(matches!(result, Err(BanklyError::Config(_))));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/bankly.json")));
        assert!(matches!(result, Err(BanklyError::Config(_))));
    }
}
