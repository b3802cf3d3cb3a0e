//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{dashboard_handler, parcel_handler, user_handler};
use crate::domain::{
    AssignDeliveryMan, BookingStatus, BookingStatusChange, BookingVolume, DeliveryManLedgerEntry,
    FleetSummary, Parcel, ParcelCandidate, ParcelEdit, ParcelReview, ParcelWithUser,
    PaymentStatus, User, UserCandidate, UserChanges, UserLedgerEntry, UserStatus,
};
use crate::types::UserLedgerPage;

/// OpenAPI documentation for the parcel tracker
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parcel Tracker",
        version = "0.1.0",
        description = "Parcel bookings with transactional contact updates and delivery dashboards",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        // Parcel endpoints
        parcel_handler::list_parcels,
        parcel_handler::get_parcel,
        parcel_handler::book_parcel,
        parcel_handler::edit_parcel,
        parcel_handler::assign_delivery_man,
        parcel_handler::update_booking_status,
        parcel_handler::review_parcel,
        // Dashboard endpoints
        dashboard_handler::fleet_summary,
        dashboard_handler::user_ledger,
        dashboard_handler::delivery_man_ledger,
        dashboard_handler::top_performers,
        dashboard_handler::booking_time_series,
    ),
    components(
        schemas(
            // Users
            UserStatus,
            User,
            UserCandidate,
            UserChanges,
            // Parcels
            BookingStatus,
            PaymentStatus,
            Parcel,
            ParcelWithUser,
            ParcelCandidate,
            ParcelEdit,
            AssignDeliveryMan,
            BookingStatusChange,
            ParcelReview,
            // Dashboard
            FleetSummary,
            UserLedgerEntry,
            UserLedgerPage,
            DeliveryManLedgerEntry,
            BookingVolume,
        )
    ),
    tags(
        (name = "Users", description = "User registry"),
        (name = "Parcels", description = "Booking workflow and parcel lifecycle"),
        (name = "Dashboard", description = "Read-only delivery metrics")
    )
)]
pub struct ApiDoc;
