//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! DDD: Domain layer has NO storage dependencies.
//! Contains: Entities, write payloads and their schema rules, dashboard views.

pub mod dashboard;
pub mod parcel;
pub mod schema;
pub mod user;

pub use dashboard::{BookingVolume, DeliveryManLedgerEntry, FleetSummary, UserLedgerEntry};
pub use parcel::{
    AssignDeliveryMan, BookingStatus, BookingStatusChange, NewParcel, Parcel, ParcelCandidate,
    ParcelChanges, ParcelEdit, ParcelFilter, ParcelReview, ParcelWithUser, PaymentStatus,
};
pub use schema::Schema;
pub use user::{NewUser, User, UserCandidate, UserChanges, UserFilter, UserStatus};
