//! Session token service.
//!
//! Signs and verifies the bearer tokens handed out on login. Tokens carry
//! only the admin id; the permission matrix is always re-read from the
//! database so revocations take effect on the next request.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: String,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expiration, unix seconds.
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_days: i64,
}

impl TokenService {
    /// Builds a signer from the configured secret.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty secret; the service refuses to run
    /// with an unsigned session scheme.
    pub fn new(secret: &str, ttl_days: i64) -> anyhow::Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("Session secret must not be empty");
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_days,
        })
    }

    pub fn issue(&self, admin_id: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: admin_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.ttl_days)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(data.claims)
    }

    #[must_use]
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::new("unit-test-secret", 7).unwrap();
        let token = service.issue("admin-42").unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin-42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let issuer = TokenService::new("secret-a", 7).unwrap();
        let verifier = TokenService::new("secret-b", 7).unwrap();

        let token = issuer.issue("admin-42").unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = TokenService::new("unit-test-secret", -1).unwrap();
        let token = service.issue("admin-42").unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_empty_secret_is_refused() {
        assert!(TokenService::new("", 7).is_err());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            TokenService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(TokenService::extract_from_header("Basic abc"), None);
    }
}
