//! Shared fixtures for auth-service integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use auth_service_lib::infra::{TransactionContext, UnitOfWork};
use auth_service_lib::repository::UserRepository;
use auth_service_lib::service::{Authenticator, TokenService};
use common::{AppError, AppResult, JwtConfig};
use domain::{Argon2Hasher, User};

pub const ACCESS_SECRET: &str = "integration-access-secret-32-chars!!";
pub const REFRESH_SECRET: &str = "integration-refresh-secret-32-chars!";

/// Users keyed by email, with the unique-email rule of the real table.
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<String, User>>,
}

impl InMemoryUsers {
    fn snapshot(&self) -> HashMap<String, User> {
        self.rows.lock().unwrap().clone()
    }

    fn replace(&self, rows: HashMap<String, User>) {
        *self.rows.lock().unwrap() = rows;
    }

    fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&user.email) {
            return Err(AppError::AlreadyExists);
        }
        rows.insert(user.email.clone(), user.clone());
        Ok(user.id)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.rows
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }
}

/// Unit of work over [`InMemoryUsers`].
///
/// Each scope works on a staged copy that replaces the committed rows only
/// when the body returns `Ok`. Scopes are serialized, like conflicting writers
/// on the unique index.
#[derive(Default)]
pub struct InMemoryUnitOfWork {
    committed: Arc<InMemoryUsers>,
    scope: AsyncMutex<()>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed user rows.
    pub fn user_count(&self) -> usize {
        self.committed.len()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.committed.clone()
    }

    async fn run_in_tx<F, T>(&self, body: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        let _scope = self.scope.lock().await;

        let staged = InMemoryUsers::default();
        staged.replace(self.committed.snapshot());

        let value = body(TransactionContext::new(&staged)).await?;
        self.committed.replace(staged.snapshot());
        Ok(value)
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: ACCESS_SECRET.to_string(),
        refresh_secret: REFRESH_SECRET.to_string(),
        ..JwtConfig::default()
    }
}

/// Argon2 with the smallest cost the crate accepts.
pub fn fast_hasher() -> Arc<Argon2Hasher> {
    let params = argon2::Params::new(1024, 1, 1, None).unwrap();
    Arc::new(Argon2Hasher::with_params(params))
}

pub struct TestApp {
    pub uow: Arc<InMemoryUnitOfWork>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<Authenticator<InMemoryUnitOfWork>>,
}

pub fn test_app() -> TestApp {
    test_app_with(jwt_config())
}

pub fn test_app_with(config: JwtConfig) -> TestApp {
    let uow = Arc::new(InMemoryUnitOfWork::new());
    let tokens = Arc::new(TokenService::new(&config));
    let auth = Arc::new(Authenticator::with_hasher(
        uow.clone(),
        tokens.clone(),
        fast_hasher(),
    ));
    TestApp { uow, tokens, auth }
}
