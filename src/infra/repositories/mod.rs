//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Write queries are generic over `ConnectionTrait` so the same code runs
//! on the pool and inside a transaction.

mod analytics_repository;
pub(crate) mod entities;
pub(crate) mod parcel_repository;
pub(crate) mod user_repository;

pub use analytics_repository::{AnalyticsRepository, AnalyticsStore};
pub use parcel_repository::{ParcelRepository, ParcelStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use parcel_repository::MockParcelRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
