//! Authentication service - registration, login and token lifecycle.
//!
//! Composes credential hashing, the token service and the user store into the
//! five public operations. Only sign-up mutates the store, and it does so
//! inside a single transaction scope.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use crate::service::TokenService;
use crate::with_transaction;
use common::{AppError, AppResult};
use domain::{
    validate_token_format, Argon2Hasher, CredentialHasher, LoginCredentials, TokenPair, User,
};

/// Verified against when the email is unknown, so a miss costs as much as a hit.
const DUMMY_PASSWORD: &str = "timing-equalizer-password";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue a token pair
    async fn sign_up(&self, credentials: LoginCredentials) -> AppResult<TokenPair>;

    /// Check credentials and issue a token pair
    async fn login(&self, credentials: LoginCredentials) -> AppResult<TokenPair>;

    /// Exchange a refresh token for a brand-new pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;

    /// Identify the user behind an access token being logged out.
    ///
    /// Tokens are stateless, so nothing is invalidated server-side.
    async fn logout(&self, access_token: &str) -> AppResult<Uuid>;

    /// Authenticate a bearer access token and return its user ID
    async fn validate(&self, access_token: &str) -> AppResult<Uuid>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenService>,
    hasher: Arc<dyn CredentialHasher>,
    dummy_hash: OnceCell<Option<String>>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with the default Argon2 hasher
    pub fn new(uow: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self::with_hasher(uow, tokens, Arc::new(Argon2Hasher::new()))
    }

    /// Create new auth service instance with an explicit hasher
    pub fn with_hasher(
        uow: Arc<U>,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            uow,
            tokens,
            hasher,
            dummy_hash: OnceCell::new(),
        }
    }

    fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| self.hasher.hash(DUMMY_PASSWORD).ok())
            .as_deref()
    }

    /// Structural check plus access-token validation.
    fn access_subject(&self, access_token: &str) -> AppResult<Uuid> {
        validate_token_format(access_token)?;
        let claims = self.tokens.validate_access_token(access_token).map_err(|e| {
            tracing::warn!("Access token rejected: {}", e);
            e
        })?;
        Ok(claims.user_id)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn sign_up(&self, credentials: LoginCredentials) -> AppResult<TokenPair> {
        credentials.check()?;

        let LoginCredentials { email, password } = credentials;
        let hasher = self.hasher.clone();
        let tokens = self.tokens.clone();

        let (user, pair) = with_transaction!(self.uow, |ctx| {
            // Early, clean rejection; the unique index still decides races
            match ctx.users().get_user_by_email(&email).await {
                Ok(_) => return Err(AppError::AlreadyExists),
                Err(AppError::UserNotFound) => {}
                Err(e) => return Err(e),
            }

            let password_hash = hasher.hash(&password)?;
            let mut user = User::new(email, password_hash);
            user.id = ctx.users().create_user(&user).await?;

            // Signed before commit so a signing failure leaves no row behind
            let pair = tokens.generate_pair(&user)?;
            Ok::<_, AppError>((user, pair))
        })
        .map_err(|e| {
            if matches!(e, AppError::AlreadyExists) {
                tracing::warn!("Sign-up rejected: email already registered");
            } else {
                tracing::error!("Failed to create user: {}", e);
            }
            e
        })?;

        tracing::info!(user_id = %user.id, email = %user.email, "User signed up");
        Ok(pair)
    }

    async fn login(&self, credentials: LoginCredentials) -> AppResult<TokenPair> {
        credentials.check()?;

        let user = match self.uow.users().get_user_by_email(&credentials.email).await {
            Ok(user) => user,
            Err(AppError::UserNotFound) => {
                if let Some(hash) = self.dummy_hash() {
                    self.hasher.verify(&credentials.password, hash);
                }
                tracing::warn!(email = %credentials.email, "Login rejected: unknown email");
                return Err(AppError::UserNotFound);
            }
            Err(e) => return Err(e),
        };

        if !self.hasher.verify(&credentials.password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::WrongPassword);
        }

        let pair = self.tokens.generate_pair(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        validate_token_format(refresh_token)?;

        let claims = self
            .tokens
            .validate_refresh_token(refresh_token)
            .map_err(|e| {
                tracing::warn!("Refresh token rejected: {}", e);
                e
            })?;

        // Fresh user data, not stale claims
        let user = self.uow.users().get_user_by_email(&claims.email).await?;

        // Same email, different account: the original one is gone
        if user.id != claims.user_id {
            tracing::warn!(user_id = %claims.user_id, "Refresh rejected: account was replaced");
            return Err(AppError::UserNotFound);
        }

        let pair = self.tokens.generate_pair(&user)?;
        tracing::info!(user_id = %user.id, "Tokens refreshed");
        Ok(pair)
    }

    async fn logout(&self, access_token: &str) -> AppResult<Uuid> {
        let user_id = self.access_subject(access_token)?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(user_id)
    }

    async fn validate(&self, access_token: &str) -> AppResult<Uuid> {
        self.access_subject(access_token)
    }
}
