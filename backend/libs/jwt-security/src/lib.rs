//! Access token codec
//!
//! Access tokens are stateless HS256 JWTs carrying only the subject and the
//! issue/expiry timestamps. A token is valid iff its signature checks out and
//! the current time is before `exp`; there is no revocation list.
//!
//! `verify` deliberately returns `Option<Session>`: a bad signature, a
//! malformed token and an expired token are all the same outcome for callers,
//! which fall back to the renewal credential.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod secret_validation;

pub use secret_validation::{validate_secret_strength, SecretStrength};

/// Fixed validity horizon of an access token
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 90;

/// Identity resolved for a single request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    pub subject_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JWT secret is too weak")]
    WeakSecret,

    #[error("Subject must not be empty")]
    EmptySubject,

    #[error("Failed to encode JWT: {0}")]
    Encode(String),
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from a shared secret, refusing weak secrets
    pub fn new(secret: &str) -> Result<Self, CodecError> {
        match validate_secret_strength(secret) {
            SecretStrength::Weak => return Err(CodecError::WeakSecret),
            SecretStrength::Acceptable => {
                warn!("JWT secret is acceptable but shorter than recommended (64 bytes)")
            }
            SecretStrength::Strong => {}
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ACCESS_TOKEN_TTL_DAYS),
        })
    }

    /// Reads `JWT_SECRET`
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        Self::new(&secret).context("Invalid JWT_SECRET")
    }

    /// Override the validity horizon
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn generate(&self, subject_id: &str) -> Result<String, CodecError> {
        self.generate_at(subject_id, Utc::now())
    }

    fn generate_at(&self, subject_id: &str, now: DateTime<Utc>) -> Result<String, CodecError> {
        if subject_id.is_empty() {
            return Err(CodecError::EmptySubject);
        }

        let claims = Claims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Option<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) if !data.claims.sub.is_empty() => Some(Session {
                subject_id: data.claims.sub,
            }),
            Ok(_) => {
                debug!("Access token carries an empty subject");
                None
            }
            Err(e) => {
                debug!(error = %e, "Access token verification failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "devotion-test-secret-0f9Qx7LmZ2pR4tV8wY1k";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET).unwrap()
    }

    #[test]
    fn test_generate_then_verify_returns_subject() {
        let codec = codec();
        let token = codec.generate("u1").unwrap();

        let session = codec.verify(&token).expect("token should verify");
        assert_eq!(session.subject_id, "u1");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let codec = codec();
        let issued = Utc::now() - Duration::days(ACCESS_TOKEN_TTL_DAYS) - Duration::seconds(5);
        let token = codec.generate_at("u1", issued).unwrap();

        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn test_token_just_inside_horizon_is_accepted() {
        let codec = codec();
        let issued = Utc::now() - Duration::days(ACCESS_TOKEN_TTL_DAYS) + Duration::minutes(1);
        let token = codec.generate_at("u1", issued).unwrap();

        assert_eq!(codec.verify(&token).unwrap().subject_id, "u1");
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other = TokenCodec::new("another-secret-N3vq8Zr1Lk5Tw9Xc2Hb7Mj4Pd").unwrap();
        let token = other.generate("u1").unwrap();

        assert!(codec().verify(&token).is_none());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let codec = codec();
        assert!(codec.verify("").is_none());
        assert!(codec.verify("invalid.token.format").is_none());
        assert!(codec.verify("Bearer abc").is_none());
    }

    #[test]
    fn test_weak_secret_is_refused() {
        assert!(matches!(
            TokenCodec::new("short"),
            Err(CodecError::WeakSecret)
        ));
    }

    #[test]
    fn test_empty_subject_is_refused() {
        assert!(matches!(codec().generate(""), Err(CodecError::EmptySubject)));
    }

    #[test]
    fn test_negative_ttl_produces_expired_token() {
        let codec = codec().with_ttl(Duration::seconds(-30));
        let token = codec.generate("u1").unwrap();

        assert!(codec.verify(&token).is_none());
    }
}
