//! Signed bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. The provider holds the
//! derived signing keys and the TTL; it is immutable after construction and
//! safe for unsynchronized concurrent use.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::secret::SecretString;

/// Claim set embedded in every issued token.
///
/// Deliberately minimal: the subject identifies the user, `iat`/`exp` bound
/// the validity window. Authorization data is not embedded — every
/// authenticated caller carries the same fixed authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token subject — the authenticated username.
    pub sub: String,
    /// Issued-at, Unix timestamp seconds.
    pub iat: i64,
    /// Expiry, Unix timestamp seconds.
    pub exp: i64,
}

/// Misconfiguration detected when constructing a [`TokenProvider`].
///
/// Fatal at startup — the process must not come up with an unusable
/// token provider.
#[derive(Debug, Error)]
pub enum TokenConfigError {
    /// The signing secret is empty.
    #[error("signing secret must not be empty")]
    EmptySecret,
    /// The configured TTL is zero or negative.
    #[error("token ttl must be positive, got {0} seconds")]
    NonPositiveTtl(i64),
}

/// Why a presented token was rejected.
///
/// This taxonomy is internal: the HTTP boundary collapses every variant to
/// a generic 401 so clients cannot distinguish expired from forged tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTokenError {
    /// The token's expiry is in the past.
    #[error("token has expired")]
    Expired,
    /// The signature does not verify under the server secret.
    #[error("token signature is invalid")]
    BadSignature,
    /// The token is structurally not a valid JWT.
    #[error("token is malformed")]
    Malformed,
}

/// Token signing failed.
///
/// Signing only fails on pathological inputs (claims that cannot be
/// serialized); it is surfaced as an error rather than a panic so the
/// HTTP layer can map it to a 500.
#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct TokenCreationError(#[from] jsonwebtoken::errors::Error);

/// Creates and validates signed bearer tokens.
///
/// Holds the keys derived from the process-wide secret plus the token TTL.
/// Stateless apart from that immutable configuration — share it behind an
/// `Arc` and call it from any number of request handlers concurrently.
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenProvider {
    /// Build a provider from the signing secret and token TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenConfigError`] for an empty secret or a non-positive
    /// TTL. Callers are expected to treat this as fatal at startup.
    pub fn new(secret: &SecretString, ttl: Duration) -> Result<Self, TokenConfigError> {
        if secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        if ttl <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveTtl(ttl.num_seconds()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is invalid the second it expires.
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
            ttl,
        })
    }

    /// The configured token TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for `subject`, valid from now until now + TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenCreationError`] if signing fails.
    pub fn create_token(&self, subject: &str) -> Result<String, TokenCreationError> {
        self.create_token_at(subject, Utc::now())
    }

    /// Issue a token with an explicit issue instant. Split out so expiry
    /// behavior can be exercised without a mock clock.
    fn create_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenCreationError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the token's subject.
    ///
    /// Side-effect free: the outcome depends only on the token, the secret,
    /// and the current time.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTokenError`] for an expired, forged, or malformed
    /// token.
    pub fn validate_token(&self, token: &str) -> Result<String, InvalidTokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => InvalidTokenError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    InvalidTokenError::BadSignature
                }
                _ => InvalidTokenError::Malformed,
            })?;
        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are derived from the secret; neither is printable.
        f.debug_struct("TokenProvider")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}
