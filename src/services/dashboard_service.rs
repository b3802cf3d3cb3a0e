//! Dashboard service - Read-only operational metrics.
//!
//! No operation here opens a transaction; every view is computed by the
//! aggregation queries and returned as-is.

use async_trait::async_trait;
use std::sync::Arc;

use super::container::parallel;
use crate::config::{LEDGER_PAGE_SIZE, TOP_PERFORMERS_LIMIT};
use crate::domain::{
    BookingStatus, BookingVolume, DeliveryManLedgerEntry, FleetSummary, UserStatus,
};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{PageQuery, UserLedgerPage};

/// Dashboard service trait for dependency injection.
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Booked, delivered and registered totals
    async fn fleet_summary(&self) -> AppResult<FleetSummary>;

    /// Senders with booking totals, five per page
    async fn user_ledger(&self, page: PageQuery) -> AppResult<UserLedgerPage>;

    /// Couriers with delivery count and average rating
    async fn delivery_man_ledger(&self) -> AppResult<Vec<DeliveryManLedgerEntry>>;

    /// Best five couriers by deliveries, then rating
    async fn top_performers(&self) -> AppResult<Vec<DeliveryManLedgerEntry>>;

    /// Bookings per calendar day
    async fn booking_time_series(&self) -> AppResult<Vec<BookingVolume>>;
}

/// Concrete implementation of DashboardService using Unit of Work.
pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    /// Create new dashboard service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn fleet_summary(&self) -> AppResult<FleetSummary> {
        let analytics = self.uow.analytics();

        let (booked, delivered, registered) = parallel::join3(
            analytics.count_parcels(None),
            analytics.count_parcels(Some(BookingStatus::Delivered)),
            analytics.count_users(None),
        )
        .await?;

        Ok(FleetSummary {
            booked,
            delivered,
            registered,
        })
    }

    async fn user_ledger(&self, page: PageQuery) -> AppResult<UserLedgerPage> {
        let offset = page.offset(LEDGER_PAGE_SIZE)?;
        let analytics = self.uow.analytics();

        let (data, total_count) = parallel::join2(
            analytics.user_ledger(offset, LEDGER_PAGE_SIZE),
            analytics.count_users(Some(UserStatus::User)),
        )
        .await?;

        Ok(UserLedgerPage::new(data, total_count))
    }

    async fn delivery_man_ledger(&self) -> AppResult<Vec<DeliveryManLedgerEntry>> {
        self.uow.analytics().delivery_man_ledger().await
    }

    async fn top_performers(&self) -> AppResult<Vec<DeliveryManLedgerEntry>> {
        self.uow.analytics().top_performers(TOP_PERFORMERS_LIMIT).await
    }

    async fn booking_time_series(&self) -> AppResult<Vec<BookingVolume>> {
        self.uow.analytics().booking_time_series().await
    }
}
