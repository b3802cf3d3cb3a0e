//! Read-only dashboard views derived from users and parcels.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Headline counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct FleetSummary {
    /// All parcels ever booked
    pub booked: u64,
    /// Parcels in `delivered` state
    pub delivered: u64,
    /// All registered users
    pub registered: u64,
}

/// A sender with their booking totals
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserLedgerEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: String,
    /// Number of parcels booked
    pub booked: i64,
    /// Sum of booked parcel prices, 0 when none
    pub total_price: f64,
}

/// A courier with delivery metrics
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeliveryManLedgerEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: String,
    /// Assigned parcels in `delivered` state
    pub delivered: i64,
    /// Mean of non-zero ratings, 0 when nothing was rated
    pub avg_rating: f64,
}

/// One point of the booking time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookingVolume {
    /// Calendar date, `MM-DD-YYYY`
    #[schema(example = "03-14-2024")]
    pub x: String,
    /// Bookings on that date
    pub y: i64,
}
