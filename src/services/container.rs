//! Service Container - Centralized service access with parallel execution support.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution utilities for independent reads

use std::future::Future;
use std::sync::Arc;

use super::{DashboardService, ParcelService, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get parcel service
    fn parcels(&self) -> Arc<dyn ParcelService>;

    /// Get dashboard service
    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    parcel_service: Arc<dyn ParcelService>,
    dashboard_service: Arc<dyn DashboardService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        user_service: Arc<dyn UserService>,
        parcel_service: Arc<dyn ParcelService>,
        dashboard_service: Arc<dyn DashboardService>,
    ) -> Self {
        Self {
            user_service,
            parcel_service,
            dashboard_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        use super::{DashboardManager, ParcelManager, UserManager};

        let uow = Arc::new(Persistence::new(db, config.transaction_timeout()));

        Self::new(
            Arc::new(UserManager::new(uow.clone())),
            Arc::new(ParcelManager::new(uow.clone())),
            Arc::new(DashboardManager::new(uow)),
        )
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelService> {
        self.parcel_service.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
///
/// These functions leverage tokio's async runtime to execute multiple
/// independent operations in parallel, improving throughput.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// Both operations run concurrently and the function returns when both complete.
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (rows, total) = parallel::join2(
    ///     analytics.user_ledger(offset, 5),
    ///     analytics.count_users(Some(UserStatus::User)),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }
}
