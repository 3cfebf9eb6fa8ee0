//! Access token verification and permission checks.
//!
//! Access tokens are RS256 JWTs issued by an external identity provider. Verification happens in two stages:
//! 1. [`TokenVerifier::verify`] checks the token's signature against the provider's published key set, as well as its
//!    expiry, issuer and audience. The decoded [`JwtClaims`] are the result.
//! 2. [`check_permission`] tests whether the claims grant the permission a route requires.
//!
//! The middleware in [`crate::middleware`] runs both stages in front of protected routes.
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{
    decode,
    decode_header,
    errors::{Error as JwtError, ErrorKind},
    Algorithm,
    DecodingKey,
    Validation,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{AuthError, ServerError},
    key_set::{KeySet, KeySource},
};

/// The claims of a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
    /// Absent when the API has not been configured to add permissions to its access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl JwtClaims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.as_ref().map(|p| p.iter().any(|s| s == permission)).unwrap_or(false)
    }
}

/// Identity providers may issue the `aud` claim as a single string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(s) => s == audience,
            Self::Multiple(v) => v.iter().any(|s| s == audience),
        }
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Claims are placed in the request extensions by the authentication middleware. Using `JwtClaims` as a handler
    /// argument on an unprotected route always fails.
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or_else(|| {
            warn!("🔐️ A handler asked for token claims, but none were found. Is the route protected?");
            ServerError::AuthenticationError(AuthError::MissingHeader)
        }))
    }
}

/// Pulls the token out of an `Authorization` header value.
///
/// The value must consist of exactly two space-separated parts, the first being `Bearer` (case-sensitive).
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let parts = header.split(' ').collect::<Vec<&str>>();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        ["Bearer", _] => Err(AuthError::MalformedHeader("Token not found.".into())),
        [_, _] => Err(AuthError::MalformedHeader("Authorization header must start with \"Bearer\".".into())),
        _ => Err(AuthError::MalformedHeader("Authorization header must be \"Bearer <token>\".".into())),
    }
}

/// Checks that `claims` grant `permission`.
pub fn check_permission(claims: &JwtClaims, permission: &str) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::PermissionsNotIncluded);
    }
    if claims.has_permission(permission) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized(permission.to_string()))
    }
}

/// Verifies RS256 access tokens against the identity provider's key set.
pub struct TokenVerifier {
    keys: KeySource,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new<K: Into<KeySource>>(keys: K, issuer: &str, audience: &str) -> Self {
        Self { keys: keys.into(), issuer: issuer.to_string(), audience: audience.to_string() }
    }

    pub async fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!("🔐️ Could not parse token header. {e}");
            AuthError::InvalidHeader("Unable to parse authentication token.".into())
        })?;
        if header.alg != Algorithm::RS256 {
            debug!("🔐️ Token is signed with {:?}, not RS256", header.alg);
            return Err(AuthError::InvalidHeader("Token must be signed with RS256.".into()));
        }
        let kid = header.kid.ok_or_else(|| AuthError::InvalidHeader("Token header has no key id.".into()))?;
        let jwk = self.keys.find_key(&kid).await?.ok_or_else(|| {
            debug!("🔐️ No signing key with id {kid}");
            AuthError::InvalidHeader("Unable to find the appropriate key.".into())
        })?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            warn!("🔐️ Signing key {kid} cannot be used for verification. {e}");
            AuthError::InvalidHeader("Unable to find the appropriate key.".into())
        })?;
        let mut validation = Validation::new(Algorithm::RS256);
        // No clock skew allowance: a token is expired the second its `exp` passes
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        let data = decode::<JwtClaims>(token, &key, &validation).map_err(token_error)?;
        trace!("🔐️ Verified token for {}", data.claims.sub);
        Ok(data.claims)
    }
}

fn token_error(e: JwtError) -> AuthError {
    debug!("🔐️ Token rejected. {e}");
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
            AuthError::InvalidClaims("Please check the audience and issuer.".into())
        },
        ErrorKind::ImmatureSignature => AuthError::InvalidClaims("Token is not valid yet.".into()),
        ErrorKind::MissingRequiredClaim(c) => AuthError::InvalidClaims(format!("The {c} claim is missing.")),
        ErrorKind::Json(_) => AuthError::InvalidClaims("Token claims could not be read.".into()),
        _ => AuthError::InvalidHeader("Unable to parse authentication token.".into()),
    }
}
