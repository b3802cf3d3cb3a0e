//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Schema, User, UserCandidate, UserChanges, UserFilter};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List users matching the filter
    async fn list_users(&self, filter: UserFilter) -> AppResult<Vec<User>>;

    /// Validate and register a new user. Email must be unused.
    async fn create_user(&self, candidate: UserCandidate) -> AppResult<User>;

    /// Update the allow-listed user fields
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self, filter: UserFilter) -> AppResult<Vec<User>> {
        self.uow.users().list(filter).await
    }

    async fn create_user(&self, candidate: UserCandidate) -> AppResult<User> {
        let user = candidate.normalize()?;
        let users = self.uow.users();

        // The unique index re-checks this at insert time
        if users.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("email"));
        }

        let created = users.create(user).await?;
        tracing::info!(user_id = %created.id, status = %created.status, "User registered");
        Ok(created)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        changes.check()?;
        self.uow.users().update(id, changes).await
    }
}
