//! Token value types shared by the token service and the orchestrator.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Compact JWS shape: header.payload.signature, base64url without padding.
static COMPACT_JWS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("valid regex")
});

/// Token class. Each class is signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenClass::Access => write!(f, "access"),
            TokenClass::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims payload. Identical for both token classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub user_id: Uuid,
    pub email: String,
    /// Expiration as Unix seconds
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Issue time as Unix seconds
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Unique per issued token, so two tokens minted in the same second differ
    #[serde(rename = "jti")]
    pub token_id: Uuid,
}

/// Access and refresh token issued together for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

/// Reject strings that cannot possibly be a signed token before any
/// cryptographic work is done.
pub fn validate_token_format(token: &str) -> DomainResult<()> {
    if token.is_empty() {
        return Err(DomainError::validation("token: Token is required"));
    }
    if !COMPACT_JWS.is_match(token) {
        return Err(DomainError::validation("token: Malformed token"));
    }
    Ok(())
}
