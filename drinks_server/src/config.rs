use std::{env, time::Duration};

use log::*;

use crate::{
    auth::TokenVerifier,
    errors::ServerError,
    key_set::{KeySource, RemoteKeySet, StaticKeySet},
};

const DEFAULT_DRINKS_HOST: &str = "127.0.0.1";
const DEFAULT_DRINKS_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/drinks.db";
const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If true, every drink record is deleted when the server starts.
    pub reset_db: bool,
    /// If true (and `reset_db` is set), the sample drink is inserted after the reset.
    pub seed_db: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DRINKS_HOST.to_string(),
            port: DEFAULT_DRINKS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            reset_db: false,
            seed_db: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("DRINKS_HOST").ok().unwrap_or_else(|| DEFAULT_DRINKS_HOST.into());
        let port = env::var("DRINKS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DRINKS_PORT. {e} Using the default, {DEFAULT_DRINKS_PORT}, \
                         instead."
                    );
                    DEFAULT_DRINKS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DRINKS_PORT);
        let database_url = env::var("DRINKS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ DRINKS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::from_env_or_default();
        let reset_db = env_flag("DRINKS_RESET_DB");
        let seed_db = env_flag("DRINKS_SEED_DB");
        if seed_db && !reset_db {
            warn!("🪛️ DRINKS_SEED_DB has no effect unless DRINKS_RESET_DB is also set.");
        }
        Self { host, port, database_url, auth, reset_db, seed_db }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|s| &s == "1" || s.to_lowercase() == "true").unwrap_or(false)
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// The identity provider's domain, e.g. `my-tenant.eu.auth0.com`.
    pub domain: String,
    /// The audience that access tokens must be issued for. This is the identifier of the drinks API.
    pub audience: String,
    /// Overrides the key set URL derived from `domain`.
    pub jwks_url: Option<String>,
    /// When set, signing keys are read once from this file and never fetched.
    pub jwks_file: Option<String>,
    pub jwks_cache_ttl: Duration,
}

impl AuthConfig {
    pub fn from_env_or_default() -> Self {
        let domain = env::var("DRINKS_AUTH0_DOMAIN").ok().unwrap_or_else(|| {
            error!(
                "🪛️ DRINKS_AUTH0_DOMAIN is not set. Please set it to the domain of your identity provider. No access \
                 token will be accepted until you do."
            );
            String::default()
        });
        let audience = env::var("DRINKS_API_AUDIENCE").ok().unwrap_or_else(|| {
            error!("🪛️ DRINKS_API_AUDIENCE is not set. Please set it to the identifier of the drinks API.");
            String::default()
        });
        let jwks_url = env::var("DRINKS_JWKS_URL").ok().filter(|s| !s.is_empty());
        let jwks_file = env::var("DRINKS_JWKS_FILE").ok().filter(|s| !s.is_empty());
        let jwks_cache_ttl = env::var("DRINKS_JWKS_CACHE_TTL")
            .map_err(|_| {
                info!(
                    "🪛️ DRINKS_JWKS_CACHE_TTL is not set. Using the default value of {}s.",
                    DEFAULT_JWKS_CACHE_TTL.as_secs()
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for DRINKS_JWKS_CACHE_TTL. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_JWKS_CACHE_TTL);
        Self { domain, audience, jwks_url, jwks_file, jwks_cache_ttl }
    }

    /// The expected `iss` claim, `https://<domain>/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        self.jwks_url.clone().unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", self.domain))
    }

    /// Builds the key source described by this configuration. A key set file takes precedence over fetching.
    pub fn key_source(&self) -> Result<KeySource, ServerError> {
        match &self.jwks_file {
            Some(path) => {
                let keys = StaticKeySet::from_file(path)
                    .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_JWKS_FILE]")))?;
                Ok(KeySource::from(keys))
            },
            None => {
                let url = self.jwks_url();
                info!("🪛️ Signing keys will be fetched from {url} and cached for {}s", self.jwks_cache_ttl.as_secs());
                Ok(KeySource::from(RemoteKeySet::new(url, self.jwks_cache_ttl)))
            },
        }
    }

    pub fn token_verifier(&self) -> Result<TokenVerifier, ServerError> {
        let keys = self.key_source()?;
        Ok(TokenVerifier::new(keys, &self.issuer(), &self.audience))
    }
}
