//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserChanges, UserFilter};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address (stored lowercase)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users matching the filter, oldest first
    async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>>;

    /// Insert a normalized user. A taken email yields `Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply a partial update. Missing user yields `NotFound`.
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
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
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }

    async fn list(&self, filter: UserFilter) -> AppResult<Vec<User>> {
        let mut query = UserEntity::find();

        if let Some(status) = filter.status {
            query = query.filter(user::Column::Status.eq(status.as_str()));
        }
        if let Some(email) = filter.email {
            query = query.filter(user::Column::Email.eq(email.trim().to_lowercase()));
        }

        let models = query
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        create(&self.db, user).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        update(&self.db, id, changes).await
    }
}

// Connection-generic queries, shared with the transaction-scoped repository.

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(User::from))
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<User>> {
    let result = UserEntity::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(User::from))
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, user: NewUser) -> AppResult<User> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(user.name),
        email: Set(user.email),
        status: Set(user.status.as_str().to_string()),
        phone: Set(user.phone),
        photo: Set(user.photo),
        created_at: Set(Utc::now()),
    };

    let model = active_model
        .insert(db)
        .await
        .map_err(|e| AppError::from_write(e, "email"))?;

    Ok(User::from(model))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: UserChanges,
) -> AppResult<User> {
    let user = UserEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    if changes.is_empty() {
        return Ok(User::from(user));
    }

    let mut active: ActiveModel = user.into();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(phone);
    }
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(photo) = changes.photo {
        active.photo = Set(photo);
    }

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(User::from(model))
}
