//! Signing keys for access tokens.
//!
//! Tokens are issued by an external identity provider, which publishes its RS256 public keys as a JSON Web Key Set.
//! [`RemoteKeySet`] fetches that document and caches it for a configurable time. [`StaticKeySet`] holds a fixed set of
//! keys, loaded from a file or built in-memory, and never goes to the network.
use std::{
    path::Path,
    time::{Duration, Instant},
};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use log::*;
use tokio::sync::RwLock;

use crate::errors::AuthError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

#[allow(async_fn_in_trait)]
pub trait KeySet {
    /// Looks up the verification key with the given key id. `Ok(None)` means the key set was available but does not
    /// contain the key.
    async fn find_key(&self, kid: &str) -> Result<Option<Jwk>, AuthError>;
}

//--------------------------------------    StaticKeySet      ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct StaticKeySet {
    keys: JwkSet,
}

impl StaticKeySet {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let keys = serde_json::from_str::<JwkSet>(json)
            .map_err(|e| AuthError::KeySetUnavailable(format!("Not a valid JSON Web Key Set. {e}")))?;
        Ok(Self::new(keys))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AuthError::KeySetUnavailable(format!("Could not read {}. {e}", path.display())))?;
        let set = Self::from_json(&json)?;
        info!("🔐️ Loaded {} signing keys from {}", set.keys.keys.len(), path.display());
        Ok(set)
    }
}

impl KeySet for StaticKeySet {
    async fn find_key(&self, kid: &str) -> Result<Option<Jwk>, AuthError> {
        Ok(self.keys.find(kid).cloned())
    }
}

//--------------------------------------     RemoteKeySet     ---------------------------------------------------------
struct CachedKeys {
    fetched_at: Instant,
    keys: JwkSet,
}

/// A key set that is downloaded from the identity provider and kept for `ttl` before it is fetched again.
pub struct RemoteKeySet {
    url: String,
    ttl: Duration,
    client: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl RemoteKeySet {
    pub fn new<S: Into<String>>(url: S, ttl: Duration) -> Self {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build().unwrap_or_else(|e| {
            warn!("🔐️ Could not build the key set client. {e} Key set requests will not time out.");
            reqwest::Client::new()
        });
        Self { url: url.into(), ttl, client, cache: RwLock::new(None) }
    }

    /// Returns the cached key set, fetching a fresh copy if the cache is empty or has expired.
    pub async fn keys(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(cached.keys.clone());
                }
            }
        }
        let mut cache = self.cache.write().await;
        // Another request may have refreshed the cache while we waited for the lock
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.keys.clone());
            }
        }
        let keys = self.fetch().await?;
        *cache = Some(CachedKeys { fetched_at: Instant::now(), keys: keys.clone() });
        Ok(keys)
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        debug!("🔐️ Fetching signing keys from {}", self.url);
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!("🔐️ Could not fetch signing keys from {}. {e}", self.url);
            AuthError::KeySetUnavailable(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!("🔐️ Key set endpoint {} returned {status}", self.url);
            return Err(AuthError::KeySetUnavailable(format!("Key set endpoint returned {status}")));
        }
        let keys = response.json::<JwkSet>().await.map_err(|e| {
            warn!("🔐️ The key set from {} could not be parsed. {e}", self.url);
            AuthError::KeySetUnavailable(e.to_string())
        })?;
        info!("🔐️ Fetched {} signing keys from {}", keys.keys.len(), self.url);
        Ok(keys)
    }
}

impl KeySet for RemoteKeySet {
    async fn find_key(&self, kid: &str) -> Result<Option<Jwk>, AuthError> {
        let keys = self.keys().await?;
        Ok(keys.find(kid).cloned())
    }
}

//--------------------------------------      KeySource       ---------------------------------------------------------
/// The key set chosen at start-up.
pub enum KeySource {
    Static(StaticKeySet),
    Remote(RemoteKeySet),
}

impl KeySet for KeySource {
    async fn find_key(&self, kid: &str) -> Result<Option<Jwk>, AuthError> {
        match self {
            Self::Static(keys) => keys.find_key(kid).await,
            Self::Remote(keys) => keys.find_key(kid).await,
        }
    }
}

impl From<StaticKeySet> for KeySource {
    fn from(keys: StaticKeySet) -> Self {
        Self::Static(keys)
    }
}

impl From<RemoteKeySet> for KeySource {
    fn from(keys: RemoteKeySet) -> Self {
        Self::Remote(keys)
    }
}
