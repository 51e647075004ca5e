//! Signing key set (JWKS) and its process-wide cache.
//!
//! The cache holds an immutable `Arc<KeySet>` snapshot. Readers clone the
//! `Arc`; a refresh builds a whole new set and swaps it in. Concurrent
//! refreshes are allowed, the last one to finish wins.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{Arc, Mutex, PoisonError, RwLock},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use jsonwebtoken::{
    Algorithm, DecodingKey,
    jwk::{Jwk, PublicKeyUse},
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::error::AuthError;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("failed to fetch JWKS from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("JWKS endpoint {url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode JWKS: {0}")]
    Decode(String),
}

impl From<KeySetError> for AuthError {
    fn from(e: KeySetError) -> Self {
        AuthError::KeySetUnavailable(e.to_string())
    }
}

/// One verification key from the issuer's JWKS.
#[derive(Clone)]
pub struct SigningKey {
    pub kid: String,
    /// `alg` declared by the JWK, if any. Tokens must then use exactly this.
    pub algorithm: Option<Algorithm>,
    pub key: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct KeySet {
    keys: HashMap<String, SigningKey>,
}

#[derive(Deserialize)]
struct JwksDocument {
    keys: Vec<Value>,
}

impl KeySet {
    /// Build a key set from a JWKS document (`{"keys": [...]}`).
    ///
    /// Entries that cannot be used for signature verification (no `kid`,
    /// encryption keys, unsupported key types or algorithms) are skipped.
    pub fn from_jwks(document: Value) -> Result<Self, KeySetError> {
        let document: JwksDocument =
            serde_json::from_value(document).map_err(|e| KeySetError::Decode(e.to_string()))?;

        let mut keys = HashMap::new();
        for entry in document.keys {
            match parse_entry(&entry) {
                Ok(key) => {
                    keys.insert(key.kid.clone(), key);
                }
                Err(reason) => {
                    let kid = entry.get("kid").and_then(Value::as_str).unwrap_or("-");
                    warn!(kid, reason, "skipping unusable JWKS entry");
                }
            }
        }

        Ok(Self { keys })
    }

    pub fn get(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn parse_entry(entry: &Value) -> Result<SigningKey, &'static str> {
    let jwk: Jwk = serde_json::from_value(entry.clone()).map_err(|_| "unparsable jwk")?;

    let kid = jwk
        .common
        .key_id
        .clone()
        .filter(|kid| !kid.is_empty())
        .ok_or("missing kid")?;

    if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
        return Err("encryption key");
    }

    let algorithm = match entry.get("alg").and_then(Value::as_str) {
        Some(alg) => Some(Algorithm::from_str(alg).map_err(|_| "unsupported alg")?),
        None => None,
    };

    let key = DecodingKey::from_jwk(&jwk).map_err(|_| "unsupported key type")?;

    Ok(SigningKey {
        kid,
        algorithm,
        key,
    })
}

/// Where key sets come from.
#[async_trait]
pub trait KeySetSource: Send + Sync + 'static {
    // Human-readable origin (for logging).
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<KeySet, KeySetError>;
}

/// Fetches the issuer's published JWKS over HTTPS.
#[derive(Clone, Debug)]
pub struct HttpKeySetSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpKeySetSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KeySetError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| KeySetError::Fetch {
                url: self.url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(KeySetError::Status {
                url: self.url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| KeySetError::Decode(e.to_string()))?;

        KeySet::from_jwks(document)
    }
}

/// A fixed JWKS document (offline development and tests).
#[derive(Clone, Debug)]
pub struct StaticKeySetSource {
    document: Value,
}

impl StaticKeySetSource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }
}

#[async_trait]
impl KeySetSource for StaticKeySetSource {
    fn describe(&self) -> String {
        "static JWKS".to_string()
    }

    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        KeySet::from_jwks(self.document.clone())
    }
}

/// Process-wide signing key cache.
///
/// - populated lazily on first use
/// - refreshed on a `kid` miss, at most once per `min_refresh_interval`
/// - never invalidated otherwise
pub struct KeySetCache {
    source: Arc<dyn KeySetSource>,
    snapshot: RwLock<Option<Arc<KeySet>>>,
    last_refresh: Mutex<Option<Instant>>,
    min_refresh_interval: Duration,
}

impl std::fmt::Debug for KeySetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySetCache")
            .field("source", &self.source.describe())
            .field("loaded_keys", &self.snapshot().map(|s| s.len()))
            .field("min_refresh_interval", &self.min_refresh_interval)
            .finish()
    }
}

impl KeySetCache {
    pub fn new(source: Arc<dyn KeySetSource>, min_refresh_interval: Duration) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
            last_refresh: Mutex::new(None),
            min_refresh_interval,
        }
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Current snapshot, `None` until the first successful fetch.
    pub fn snapshot(&self) -> Option<Arc<KeySet>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch the key set and swap it in.
    pub async fn refresh(&self) -> Result<Arc<KeySet>, KeySetError> {
        // Recorded before fetching so an outage is rate-limited too.
        *self
            .last_refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        let fetched = Arc::new(self.source.fetch().await?);
        if fetched.is_empty() {
            warn!(
                source = %self.source.describe(),
                "signing key set has no usable keys, every token will be rejected"
            );
        }
        info!(
            source = %self.source.describe(),
            keys = fetched.len(),
            "signing key set refreshed"
        );

        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(fetched.clone());

        Ok(fetched)
    }

    fn refresh_allowed(&self) -> bool {
        self.last_refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none_or(|at| at.elapsed() >= self.min_refresh_interval)
    }

    /// Look up `kid`, loading or refreshing the set as the policy allows.
    pub async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let (current, just_loaded) = match self.snapshot() {
            Some(current) => (current, false),
            None => (self.refresh().await?, true),
        };

        if let Some(key) = current.get(kid) {
            return Ok(key.clone());
        }

        if !just_loaded && self.refresh_allowed() {
            debug!(kid, "unknown kid, refreshing signing key set");
            let refreshed = self.refresh().await?;
            if let Some(key) = refreshed.get(kid) {
                return Ok(key.clone());
            }
        }

        Err(AuthError::UnknownSigningKey(kid.to_string()))
    }
}
