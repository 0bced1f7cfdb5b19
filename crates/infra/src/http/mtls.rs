//! Mutual-TLS identity loading and per-configuration client reuse
//!
//! Certificate and key files are read on every call made under a complete
//! configuration; the built client is reused only while both files keep the
//! same contents. Encrypted PKCS#8 keys and traditional OpenSSL encrypted PEM
//! keys are decrypted with the configured passphrase; unencrypted keys are
//! used as-is. Any unreadable or invalid material is a
//! [`TransportErrorKind::Tls`] error.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bankly_domain::{BanklyError, MtlsConfig, TransportErrorKind};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockDecryptMut, KeyIvInit};
use md5::{Digest, Md5};
use parking_lot::Mutex;
use pkcs8::{EncryptedPrivateKeyInfo, LineEnding};
use reqwest::Identity;
use tracing::debug;

use super::client::HttpClient;

const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const LEGACY_ENCRYPTED_MARKER: &str = "Proc-Type: 4,ENCRYPTED";

fn tls_error(message: impl Into<String>) -> BanklyError {
    BanklyError::transport(TransportErrorKind::Tls, message)
}

fn read_pem(path: &Path, what: &str) -> Result<String, BanklyError> {
    std::fs::read_to_string(path)
        .map_err(|e| tls_error(format!("cannot read {what} {}: {e}", path.display())))
}

/// Decrypt an `ENCRYPTED PRIVATE KEY` PEM into a plain PKCS#8 PEM
pub fn decrypt_private_key(pem: &str, passphrase: &str) -> Result<String, BanklyError> {
    let (label, document) = pkcs8::Document::from_pem(pem)
        .map_err(|e| tls_error(format!("invalid private key PEM: {e}")))?;
    if label != ENCRYPTED_KEY_LABEL {
        return Err(tls_error(format!("expected {ENCRYPTED_KEY_LABEL}, found {label}")));
    }

    let encrypted = EncryptedPrivateKeyInfo::try_from(document.as_bytes())
        .map_err(|e| tls_error(format!("invalid encrypted private key: {e}")))?;
    let decrypted = encrypted
        .decrypt(passphrase)
        .map_err(|e| tls_error(format!("cannot decrypt private key: {e}")))?;
    let pem = decrypted
        .to_pem("PRIVATE KEY", LineEnding::LF)
        .map_err(|e| tls_error(format!("cannot encode private key: {e}")))?;

    Ok(pem.to_string())
}

#[derive(PartialEq, Eq)]
struct KeyMaterial {
    cert: String,
    key: String,
}

fn read_material(mtls: &MtlsConfig) -> Result<(KeyMaterial, &str), BanklyError> {
    let (Some(cert_path), Some(key_path), Some(passphrase)) =
        (&mtls.cert_path, &mtls.key_path, &mtls.passphrase)
    else {
        return Err(tls_error("certificate, key and passphrase are all required"));
    };

    let cert = read_pem(cert_path, "certificate")?;
    let key = read_pem(key_path, "private key")?;
    Ok((KeyMaterial { cert, key }, passphrase))
}

fn identity_from_pem(material: &KeyMaterial, passphrase: &str) -> Result<Identity, BanklyError> {
    let key = if material.key.contains(ENCRYPTED_KEY_LABEL) {
        decrypt_private_key(&material.key, passphrase)?
    } else if material.key.contains(LEGACY_ENCRYPTED_MARKER) {
        decrypt_legacy_key(&material.key, passphrase)?
    } else {
        material.key.clone()
    };

    let mut bundle = material.cert.clone();
    if !bundle.ends_with('\n') {
        bundle.push('\n');
    }
    bundle.push_str(&key);

    Identity::from_pem(bundle.as_bytes()).map_err(|e| tls_error(format!("invalid client identity: {e}")))
}

/// Key derivation used by OpenSSL's traditional PEM encryption
/// (`EVP_BytesToKey` with MD5, one iteration)
fn evp_bytes_to_key(passphrase: &[u8], salt: &[u8], len: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(len);
    let mut block = Vec::new();
    while key.len() < len {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        key.extend_from_slice(&block);
    }
    key.truncate(len);
    key
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, BanklyError>
where
    C: BlockCipher + BlockDecryptMut,
    cbc::Decryptor<C>: KeyIvInit,
{
    let mut buf = data.to_vec();
    let plain = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| tls_error(format!("invalid key or IV length: {e}")))?
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map_err(|_| tls_error("cannot decrypt private key: wrong passphrase or corrupt key"))?;
    Ok(plain.to_vec())
}

/// Decrypt a traditional `Proc-Type: 4,ENCRYPTED` PEM key
///
/// Supports the `AES-{128,192,256}-CBC` and `DES-EDE3-CBC` ciphers OpenSSL
/// writes. The result keeps the original label (`RSA PRIVATE KEY`,
/// `EC PRIVATE KEY`) without the encryption headers.
pub fn decrypt_legacy_key(pem: &str, passphrase: &str) -> Result<String, BanklyError> {
    let mut label = None;
    let mut dek_info = None;
    let mut body = String::new();
    for line in pem.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("-----BEGIN ") {
            label = rest.strip_suffix("-----");
        } else if line.starts_with("-----END ") {
            break;
        } else if label.is_none() || line.is_empty() {
            continue;
        } else if let Some(value) = line.strip_prefix("DEK-Info:") {
            dek_info = Some(value.trim());
        } else if !line.contains(':') {
            body.push_str(line);
        }
    }

    let label = label.ok_or_else(|| tls_error("invalid private key PEM: missing BEGIN line"))?;
    let (cipher, iv_hex) = dek_info
        .and_then(|info| info.split_once(','))
        .ok_or_else(|| tls_error("encrypted PEM key has no DEK-Info header"))?;
    let iv = hex::decode(iv_hex.trim()).map_err(|e| tls_error(format!("invalid DEK-Info IV: {e}")))?;
    if iv.len() < 8 {
        return Err(tls_error("invalid DEK-Info IV: too short"));
    }
    let data = STANDARD.decode(&body).map_err(|e| tls_error(format!("invalid private key PEM: {e}")))?;

    let derive = |len| evp_bytes_to_key(passphrase.as_bytes(), &iv[..8], len);
    let der = match cipher.trim() {
        "AES-128-CBC" => cbc_decrypt::<aes::Aes128>(&derive(16), &iv, &data)?,
        "AES-192-CBC" => cbc_decrypt::<aes::Aes192>(&derive(24), &iv, &data)?,
        "AES-256-CBC" => cbc_decrypt::<aes::Aes256>(&derive(32), &iv, &data)?,
        "DES-EDE3-CBC" => cbc_decrypt::<des::TdesEde3>(&derive(24), &iv, &data)?,
        other => return Err(tls_error(format!("unsupported PEM key cipher: {other}"))),
    };

    let encoded = STANDARD.encode(der);
    let mut out = format!("-----BEGIN {label}-----\n");
    for chunk in encoded.as_bytes().chunks(64) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    Ok(out)
}

/// Build the client identity from a complete mTLS configuration
pub fn load_identity(mtls: &MtlsConfig) -> Result<Identity, BanklyError> {
    let (material, passphrase) = read_material(mtls)?;
    identity_from_pem(&material, passphrase)
}

/// Settings shared by every client in a [`ClientPool`]
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None }
    }
}

impl HttpSettings {
    fn builder(&self) -> super::client::HttpClientBuilder {
        let builder = HttpClient::builder().timeout(self.timeout);
        match &self.user_agent {
            Some(agent) => builder.user_agent(agent.clone()),
            None => builder,
        }
    }
}

struct CachedClient {
    material: KeyMaterial,
    client: HttpClient,
}

/// Plain client plus one client per mTLS configuration seen so far
pub struct ClientPool {
    settings: HttpSettings,
    plain: HttpClient,
    mtls: Mutex<HashMap<MtlsConfig, CachedClient>>,
}

impl ClientPool {
    pub fn new(settings: HttpSettings) -> Result<Self, BanklyError> {
        let plain = settings.builder().build()?;
        Ok(Self { settings, plain, mtls: Mutex::new(HashMap::new()) })
    }

    /// Client to use for a call made under `mtls`
    ///
    /// Incomplete configurations get the plain client. Complete ones read
    /// both files; a client is rebuilt when their contents changed.
    pub fn client_for(&self, mtls: &MtlsConfig) -> Result<HttpClient, BanklyError> {
        if !mtls.is_complete() {
            return Ok(self.plain.clone());
        }

        let (material, passphrase) = match read_material(mtls) {
            Ok(read) => read,
            Err(e) => {
                self.mtls.lock().remove(mtls);
                return Err(e);
            }
        };

        let mut clients = self.mtls.lock();
        if let Some(cached) = clients.get(mtls) {
            if cached.material == material {
                return Ok(cached.client.clone());
            }
        }

        debug!(cert = ?mtls.cert_path, "building mTLS client");
        let built = identity_from_pem(&material, passphrase)
            .and_then(|identity| self.settings.builder().identity(identity).build());
        let client = match built {
            Ok(client) => client,
            Err(e) => {
                clients.remove(mtls);
                return Err(e);
            }
        };
        clients.insert(mtls.clone(), CachedClient { material, client: client.clone() });
        Ok(client)
    }

    /// Number of cached mTLS clients
    pub fn mtls_clients(&self) -> usize {
        self.mtls.lock().len()
    }
}

impl std::fmt::Debug for ClientPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientPool")
            .field("settings", &self.settings)
            .field("mtls_clients", &self.mtls_clients())
            .finish_non_exhaustive()
    }
}
