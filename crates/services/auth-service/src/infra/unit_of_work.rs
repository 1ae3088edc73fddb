//! Unit of Work - repository access plus a scoped transaction primitive.
//!
//! A transaction is never begun or committed by callers directly. They hand a
//! body to [`UnitOfWork::run_in_tx`], which commits when the body returns `Ok`
//! and rolls back when it returns `Err`. If the returned future is dropped
//! before completion the open transaction is dropped with it, and sea-orm
//! rolls it back, so no partial write ever becomes visible.

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::user_repository::{find_user_by_email, insert_user};
use crate::repository::{UserRepository, UserStore};
use common::{AppError, AppResult};
use domain::User;

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic transaction method; consumers are
/// generic over it instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// User repository outside any transaction
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute `body` within a single transaction.
    ///
    /// The body's error becomes the transaction's error, after rollback.
    async fn run_in_tx<F, T>(&self, body: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
#[derive(Clone, Copy)]
pub struct TransactionContext<'a> {
    users: &'a dyn UserRepository,
}

impl<'a> TransactionContext<'a> {
    /// Wrap a transaction-bound repository
    pub fn new(users: &'a dyn UserRepository) -> Self {
        Self { users }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> &'a dyn UserRepository {
        self.users
    }
}

/// Concrete implementation of UnitOfWork over a sea-orm connection pool.
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn run_in_tx<F, T>(&self, body: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        // ReadCommitted is enough: the unique index on email is the real guard
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let result = {
            let repo = TxUserRepository::new(&txn);
            body(TransactionContext::new(&repo)).await
        };

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
///
/// Borrows the transaction so it can never outlive it.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    /// Create new transaction-aware repository
    pub fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl<'a> UserRepository for TxUserRepository<'a> {
    async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        insert_user(self.txn, user).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        find_user_by_email(self.txn, email).await
    }
}

/// Run a block inside `UnitOfWork::run_in_tx` without spelling out the boxing.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.run_in_tx(|$ctx| Box::pin(async move { $body })).await
    };
}
