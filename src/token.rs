//! Stateless HS256 access/refresh tokens. Validity is signature + expiry + type discriminator; no server-side session.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims embedded in every token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the username the token was issued to.
    pub sub: String,
    pub typ: TokenType,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id, so two tokens issued in the same second differ.
    pub jti: String,
}

#[derive(Serialize, Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token signing secret is empty")]
    EmptySecret,
    #[error("token encode: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenType::Access, self.access_ttl)
    }

    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenType::Refresh, self.refresh_ttl)
    }

    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.issue_refresh_token(subject)?,
        })
    }

    fn issue(&self, subject: &str, typ: TokenType, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            typ,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify signature, expiry and type. Any failure yields `None`; the reason is only logged.
    pub fn verify(&self, token: &str, expected: TokenType) -> Option<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = match jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                return None;
            }
        };
        if claims.typ != expected {
            tracing::debug!(expected = ?expected, actual = ?claims.typ, "token type mismatch");
            return None;
        }
        Some(claims)
    }
}
