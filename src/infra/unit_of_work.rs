//! Unit of Work pattern implementation.
//!
//! SOLID (SRP): Manages transaction lifecycle and repository access.
//! DDD: Coordinates writes across users and parcels atomically.
//!
//! The Unit of Work pattern:
//! - Centralizes access to all repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Bounds every transaction by a timeout
//! - Hands out transaction-scoped repositories through `TransactionContext`

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::repositories::{
    parcel_repository, user_repository, AnalyticsRepository, AnalyticsStore, ParcelRepository,
    ParcelStore, UserRepository, UserStore,
};
use crate::domain::{NewParcel, NewUser, Parcel, ParcelChanges, ParcelWithUser, User, UserChanges};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock the repositories and wrap them in a test implementation.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get parcel repository
    fn parcels(&self) -> Arc<dyn ParcelRepository>;

    /// Get aggregation queries
    fn analytics(&self) -> Arc<dyn AnalyticsRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error or
    /// when the closure outlives the configured timeout.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }

    /// Get parcel repository for this transaction
    pub fn parcels(&self) -> TxParcelRepository<'_> {
        TxParcelRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    timeout: Duration,
    user_repo: Arc<UserStore>,
    parcel_repo: Arc<ParcelStore>,
    analytics: Arc<AnalyticsStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            parcel_repo: Arc::new(ParcelStore::new(db.clone())),
            analytics: Arc::new(AnalyticsStore::new(db.clone())),
            db,
            timeout,
        }
    }

    /// Begin a read-write transaction.
    ///
    /// PostgreSQL runs at READ COMMITTED; SQLite only has serializable
    /// transactions and rejects isolation settings.
    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            DbBackend::Postgres => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::ReadCommitted),
                        Some(AccessMode::ReadWrite),
                    )
                    .await
            }
            _ => self.db.begin().await,
        };
        txn.map_err(AppError::from)
    }
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(rollback_err) = txn.rollback().await {
        tracing::error!("Transaction rollback failed: {}", rollback_err);
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelRepository> {
        self.parcel_repo.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsRepository> {
        self.analytics.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.begin().await?;

        // The closure's future borrows the transaction; it is dropped here
        let outcome = {
            let ctx = TransactionContext::new(&txn);
            tokio::time::timeout(self.timeout, f(ctx)).await
        };

        match outcome {
            Ok(Ok(result)) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Ok(Err(e)) => {
                tracing::warn!("Rolling back transaction: {}", e);
                rollback(txn).await;
                Err(e)
            }
            Err(_) => {
                tracing::warn!("Transaction exceeded {:?}, rolling back", self.timeout);
                rollback(txn).await;
                Err(AppError::transaction(format!(
                    "session timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        }
    }
}

/// Transaction-aware user repository.
///
/// Executes all operations within the provided transaction.
/// Uses borrowed reference to ensure transaction outlives repository operations.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_repository::find_by_email(self.txn, email).await
    }

    pub async fn create(&self, user: NewUser) -> AppResult<User> {
        user_repository::create(self.txn, user).await
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        user_repository::update(self.txn, id, changes).await
    }
}

/// Transaction-aware parcel repository.
pub struct TxParcelRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxParcelRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ParcelWithUser>> {
        parcel_repository::find_by_id(self.txn, id).await
    }

    pub async fn create(&self, parcel: NewParcel) -> AppResult<Parcel> {
        parcel_repository::create(self.txn, parcel).await
    }

    pub async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel> {
        parcel_repository::update(self.txn, id, changes).await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
