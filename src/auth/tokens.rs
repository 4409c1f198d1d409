//! Identity token issuing and verification
//!
//! Tokens are HS256 JWTs carrying `sub` (account id), `iss` (token purpose),
//! `exp` and `iat`. Decoding is a single typed step into [`Claims`]: a token
//! with any required claim missing or mistyped is rejected as a whole.
//!
//! Expiry is checked here, against an explicit clock, rather than left to the
//! JWT library's built-in validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::models::Claims;

/// Issuer used for tokens handed out by `POST /login`
pub const LOGIN_ISSUER: &str = "login";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret not configured")]
    SecretNotConfigured,

    #[error("token subject must not be empty")]
    EmptySubject,

    #[error("token issuer must not be empty")]
    EmptyIssuer,

    #[error("token encoding failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    #[error("malformed or unsigned token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("token is missing required claims")]
    MissingClaims,

    #[error("token expired")]
    Expired,
}

impl TokenError {
    /// Whether the error is a verification failure (as opposed to an issuing failure)
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            TokenError::Malformed(_) | TokenError::MissingClaims | TokenError::Expired
        )
    }
}

/// Signs and verifies identity tokens with one process-wide secret
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::SecretNotConfigured);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Issue a token for `subject`, valid for the configured window from now
    pub fn issue(&self, issuer: &str, subject: &str) -> Result<(String, DateTime<Utc>), TokenError> {
        self.issue_at(issuer, subject, Utc::now())
    }

    pub fn issue_at(
        &self,
        issuer: &str,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        if issuer.is_empty() {
            return Err(TokenError::EmptyIssuer);
        }

        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encoding)?;

        Ok((token, expires_at))
    }

    /// Verify signature, claim shape and expiry against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(TokenError::Malformed)?;
        let claims = data.claims;

        if claims.sub.is_empty() || claims.iss.is_empty() {
            return Err(TokenError::MissingClaims);
        }

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
