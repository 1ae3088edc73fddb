//! User repository: create-user and find-by-email.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return the identifier the store assigned.
    ///
    /// Fails with `AlreadyExists` when the email is already taken.
    async fn create_user(&self, user: &User) -> AppResult<Uuid>;

    /// Find user by email address, failing with `UserNotFound` when absent.
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;
}

/// Insert a user on any connection or transaction.
pub(crate) async fn insert_user<C: ConnectionTrait>(db: &C, user: &User) -> AppResult<Uuid> {
    tracing::debug!(email = %user.email, "Inserting user");

    let model = ActiveModel::from(user)
        .insert(db)
        .await
        .map_err(AppError::from)?;

    Ok(model.id)
}

/// Look up a user by email on any connection or transaction.
pub(crate) async fn find_user_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<User> {
    UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(AppError::from)?
        .map(User::from)
        .ok_or(AppError::UserNotFound)
}

/// Concrete implementation of UserRepository outside any transaction.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        insert_user(&self.db, user).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        find_user_by_email(&self.db, email).await
    }
}
