//! Token service - dual-secret JWT issuance and validation.
//!
//! Access and refresh tokens carry identical claims but are signed with
//! independent HS256 secrets. A token of one class therefore fails signature
//! verification when presented as the other and never reaches the expiry
//! check.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{Claims, TokenClass, TokenPair, User};

/// Signing material and lifetime for one token class.
#[derive(Clone)]
struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl ClassKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

fn hours(hours: i64) -> Duration {
    Duration::try_hours(hours).unwrap_or(Duration::MAX)
}

/// Issues and validates access and refresh tokens.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    access: ClassKeys,
    refresh: ClassKeys,
    issuer: String,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build from explicit configuration.
    ///
    /// Lifetimes beyond what `Duration` can hold saturate; signing then fails
    /// with an internal error instead of panicking.
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_lifetimes(
            config,
            hours(config.access_expiration_hours),
            hours(config.refresh_expiration_hours),
        )
    }

    /// Build with lifetimes finer than whole hours.
    pub fn with_lifetimes(config: &JwtConfig, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        // Expiry is compared by hand against the caller's clock in `validate_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            access: ClassKeys::new(&config.access_secret, access_ttl),
            refresh: ClassKeys::new(&config.refresh_secret, refresh_ttl),
            issuer: config.issuer.clone(),
            validation,
        }
    }

    fn keys(&self, class: TokenClass) -> &ClassKeys {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    /// Lifetime of tokens of the given class.
    pub fn ttl(&self, class: TokenClass) -> Duration {
        self.keys(class).ttl
    }

    pub fn generate_access_token(&self, user: &User) -> AppResult<String> {
        self.generate_at(TokenClass::Access, user, Utc::now())
    }

    pub fn generate_refresh_token(&self, user: &User) -> AppResult<String> {
        self.generate_at(TokenClass::Refresh, user, Utc::now())
    }

    /// Generate an access and a refresh token for the same user.
    pub fn generate_pair(&self, user: &User) -> AppResult<TokenPair> {
        let now = Utc::now();
        Ok(TokenPair {
            user_id: user.id,
            access_token: self.generate_at(TokenClass::Access, user, now)?,
            refresh_token: self.generate_at(TokenClass::Refresh, user, now)?,
        })
    }

    /// Sign a token of `class` for `user` as if issued at `now`.
    pub fn generate_at(&self, class: TokenClass, user: &User, now: DateTime<Utc>) -> AppResult<String> {
        let keys = self.keys(class);
        let expires_at = now
            .checked_add_signed(keys.ttl)
            .ok_or_else(|| AppError::internal(format!("{} token lifetime overflows", class)))?;

        let claims = Claims {
            user_id: user.id,
            email: user.email.clone(),
            expires_at: expires_at.timestamp(),
            issued_at: now.timestamp(),
            issuer: self.issuer.clone(),
            token_id: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AppError::internal(format!("Failed to sign {} token: {}", class, e)))
    }

    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        self.validate_at(TokenClass::Access, token, Utc::now())
    }

    pub fn validate_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.validate_at(TokenClass::Refresh, token, Utc::now())
    }

    /// Verify signature and issuer with the class secret, then check expiry
    /// against `now`. A token whose `exp` equals `now` is still valid.
    pub fn validate_at(&self, class: TokenClass, token: &str, now: DateTime<Utc>) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.keys(class).decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => {
                    AppError::invalid_token(format!("signature does not match {} secret", class))
                }
                ErrorKind::InvalidIssuer => AppError::invalid_token("unexpected issuer"),
                ErrorKind::InvalidAlgorithm => AppError::invalid_token("unexpected algorithm"),
                ErrorKind::MissingRequiredClaim(claim) => {
                    AppError::invalid_token(format!("missing claim {}", claim))
                }
                _ => AppError::invalid_token(format!("malformed token: {}", e)),
            })?;

        if data.claims.expires_at < now.timestamp() {
            return Err(AppError::ExpiredToken);
        }

        Ok(data.claims)
    }
}
