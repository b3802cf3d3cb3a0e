//! Parcel domain entity, booking payloads and listing filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::schema::{required, Schema};
use super::user::User;
use crate::config::{
    BOOKING_CANCELLED, BOOKING_DELIVERED, BOOKING_ON_THE_WAY, BOOKING_PENDING, BOOKING_RETURNED,
    PAYMENT_PAID, PAYMENT_UNPAID,
};
use crate::errors::{AppError, AppResult};

/// Booking lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    OnTheWay,
    Delivered,
    Returned,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => BOOKING_PENDING,
            BookingStatus::OnTheWay => BOOKING_ON_THE_WAY,
            BookingStatus::Delivered => BOOKING_DELIVERED,
            BookingStatus::Returned => BOOKING_RETURNED,
            BookingStatus::Cancelled => BOOKING_CANCELLED,
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(s: &str) -> Self {
        match s {
            BOOKING_ON_THE_WAY => BookingStatus::OnTheWay,
            BOOKING_DELIVERED => BookingStatus::Delivered,
            BOOKING_RETURNED => BookingStatus::Returned,
            BOOKING_CANCELLED => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }
}

/// Payment state of a parcel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => PAYMENT_PAID,
            PaymentStatus::Unpaid => PAYMENT_UNPAID,
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            PAYMENT_PAID => PaymentStatus::Paid,
            _ => PaymentStatus::Unpaid,
        }
    }
}

/// Parcel domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Parcel {
    pub id: Uuid,
    /// Sender who booked the parcel
    pub user: Uuid,
    /// Assigned courier
    pub delivery_man: Option<Uuid>,
    #[schema(example = "Document")]
    pub parcel_type: String,
    pub parcel_weight: f64,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub delivery_address: String,
    pub address_latitude: f64,
    pub address_longitude: f64,
    pub requested_delivery_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub approximate_delivery_date: Option<DateTime<Utc>>,
    pub price: f64,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub rating: f64,
    pub review: String,
    pub review_giving_date: Option<DateTime<Utc>>,
    pub booking_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
}

/// Parcel with its sender resolved inline
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ParcelWithUser {
    #[serde(flatten)]
    pub parcel: Parcel,
    /// Sender record, `None` only if the reference dangles
    pub owner: Option<User>,
}

/// Booking request: parcel fields plus the sender's contact data.
///
/// `user` keys the contact update and becomes the parcel's sender; `phone`
/// is written to the user, never to the parcel. `name`, `email` and `id`
/// are not parcel fields and are ignored when present.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ParcelCandidate {
    #[validate(required)]
    pub user: Option<Uuid>,
    #[schema(example = "555-1111")]
    pub phone: Option<String>,
    pub delivery_man: Option<Uuid>,
    #[validate(required, length(min = 1, message = "cannot be empty"))]
    #[schema(example = "Document")]
    pub parcel_type: Option<String>,
    #[validate(required, range(exclusive_min = 0.0, message = "must be positive"))]
    pub parcel_weight: Option<f64>,
    #[validate(required, length(min = 1, message = "cannot be empty"))]
    pub receiver_name: Option<String>,
    #[validate(required, length(min = 1, message = "cannot be empty"))]
    pub receiver_phone: Option<String>,
    #[validate(required, length(min = 1, message = "cannot be empty"))]
    pub delivery_address: Option<String>,
    #[validate(required, range(min = -90.0, max = 90.0, message = "must be within [-90, 90]"))]
    pub address_latitude: Option<f64>,
    #[validate(required, range(min = -180.0, max = 180.0, message = "must be within [-180, 180]"))]
    pub address_longitude: Option<f64>,
    #[validate(required)]
    pub requested_delivery_date: Option<DateTime<Utc>>,
    pub approximate_delivery_date: Option<DateTime<Utc>>,
    #[validate(required, range(min = 0.0, message = "cannot be negative"))]
    pub price: Option<f64>,
    pub booking_status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(range(min = 0.0, max = 5.0, message = "must be within [0, 5]"))]
    pub rating: Option<f64>,
    pub review: Option<String>,
}

impl Schema for ParcelCandidate {
    const FIELDS: &'static [&'static str] = &[
        "user",
        "phone",
        "delivery_man",
        "parcel_type",
        "parcel_weight",
        "receiver_name",
        "receiver_phone",
        "delivery_address",
        "address_latitude",
        "address_longitude",
        "requested_delivery_date",
        "approximate_delivery_date",
        "price",
        "booking_status",
        "payment_status",
        "rating",
        "review",
    ];
}

/// Normalized parcel ready for insertion (defaults applied)
#[derive(Debug, Clone, PartialEq)]
pub struct NewParcel {
    pub user: Uuid,
    pub delivery_man: Option<Uuid>,
    pub parcel_type: String,
    pub parcel_weight: f64,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub delivery_address: String,
    pub address_latitude: f64,
    pub address_longitude: f64,
    pub requested_delivery_date: DateTime<Utc>,
    pub approximate_delivery_date: Option<DateTime<Utc>>,
    pub price: f64,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub rating: f64,
    pub review: String,
}

impl ParcelCandidate {
    /// Validate the candidate and apply defaults.
    pub fn normalize(self) -> AppResult<NewParcel> {
        self.check()?;

        Ok(NewParcel {
            user: required(self.user, "user")?,
            delivery_man: self.delivery_man,
            parcel_type: required(self.parcel_type, "parcel_type")?,
            parcel_weight: required(self.parcel_weight, "parcel_weight")?,
            receiver_name: required(self.receiver_name, "receiver_name")?,
            receiver_phone: required(self.receiver_phone, "receiver_phone")?,
            delivery_address: required(self.delivery_address, "delivery_address")?,
            address_latitude: required(self.address_latitude, "address_latitude")?,
            address_longitude: required(self.address_longitude, "address_longitude")?,
            requested_delivery_date: required(
                self.requested_delivery_date,
                "requested_delivery_date",
            )?,
            approximate_delivery_date: self.approximate_delivery_date,
            price: required(self.price, "price")?,
            booking_status: self.booking_status.unwrap_or_default(),
            payment_status: self.payment_status.unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            review: self.review.unwrap_or_default(),
        })
    }
}

/// Edit request: the sender's contact data plus the editable parcel fields.
///
/// Only the fields listed here can reach a parcel; `id`, `name`, `email`
/// are ignored and `user`/`phone` only drive the contact update.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ParcelEdit {
    pub user: Option<Uuid>,
    #[schema(example = "555-1111")]
    pub phone: Option<String>,
    pub delivery_man: Option<Uuid>,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub parcel_type: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "must be positive"))]
    pub parcel_weight: Option<f64>,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub receiver_name: Option<String>,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub receiver_phone: Option<String>,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub delivery_address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "must be within [-90, 90]"))]
    pub address_latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be within [-180, 180]"))]
    pub address_longitude: Option<f64>,
    pub requested_delivery_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub approximate_delivery_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "cannot be negative"))]
    pub price: Option<f64>,
    pub booking_status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(range(min = 0.0, max = 5.0, message = "must be within [0, 5]"))]
    pub rating: Option<f64>,
    pub review: Option<String>,
}

impl Schema for ParcelEdit {
    const FIELDS: &'static [&'static str] = &[
        "user",
        "phone",
        "delivery_man",
        "parcel_type",
        "parcel_weight",
        "receiver_name",
        "receiver_phone",
        "delivery_address",
        "address_latitude",
        "address_longitude",
        "requested_delivery_date",
        "delivery_date",
        "approximate_delivery_date",
        "price",
        "booking_status",
        "payment_status",
        "rating",
        "review",
    ];
}

impl ParcelEdit {
    /// Split into the contact update and the parcel changes.
    ///
    /// A phone without a user to key it on is rejected rather than dropped.
    pub fn split(self) -> AppResult<(Option<(Uuid, String)>, ParcelChanges)> {
        self.check()?;

        let contact = match (self.user, self.phone) {
            (Some(user), Some(phone)) => Some((user, phone)),
            (None, Some(_)) => {
                return Err(AppError::validation("user: is required when phone is provided"))
            }
            _ => None,
        };

        let changes = ParcelChanges {
            delivery_man: self.delivery_man,
            parcel_type: self.parcel_type,
            parcel_weight: self.parcel_weight,
            receiver_name: self.receiver_name,
            receiver_phone: self.receiver_phone,
            delivery_address: self.delivery_address,
            address_latitude: self.address_latitude,
            address_longitude: self.address_longitude,
            requested_delivery_date: self.requested_delivery_date,
            delivery_date: self.delivery_date,
            approximate_delivery_date: self.approximate_delivery_date,
            price: self.price,
            booking_status: self.booking_status,
            payment_status: self.payment_status,
            rating: self.rating,
            review: self.review,
            review_giving_date: None,
        };

        Ok((contact, changes))
    }
}

/// Partial parcel update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelChanges {
    pub delivery_man: Option<Uuid>,
    pub parcel_type: Option<String>,
    pub parcel_weight: Option<f64>,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub address_latitude: Option<f64>,
    pub address_longitude: Option<f64>,
    pub requested_delivery_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub approximate_delivery_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub booking_status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub review_giving_date: Option<DateTime<Utc>>,
}

/// Courier assignment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignDeliveryMan {
    pub delivery_man: Uuid,
    pub approximate_delivery_date: Option<DateTime<Utc>>,
}

impl Schema for AssignDeliveryMan {
    const FIELDS: &'static [&'static str] = &["delivery_man", "approximate_delivery_date"];
}

/// Booking status change
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookingStatusChange {
    pub booking_status: BookingStatus,
}

impl Schema for BookingStatusChange {
    const FIELDS: &'static [&'static str] = &["booking_status"];
}

/// Sender review of a delivered parcel
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ParcelReview {
    #[validate(range(min = 1.0, max = 5.0, message = "must be within [1, 5]"))]
    #[schema(example = 4.5)]
    pub rating: f64,
    #[serde(default)]
    pub review: String,
}

impl Schema for ParcelReview {
    const FIELDS: &'static [&'static str] = &["rating", "review"];
}

/// Optional filters for parcel listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParcelFilter {
    pub booking_status: Option<BookingStatus>,
    /// Sender id
    pub user: Option<Uuid>,
    /// Courier id
    pub delivery_man: Option<Uuid>,
    /// Requested delivery date lower bound (inclusive)
    pub from: Option<DateTime<Utc>>,
    /// Requested delivery date upper bound (inclusive)
    pub to: Option<DateTime<Utc>>,
}

impl ParcelFilter {
    pub fn check(&self) -> AppResult<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => {
                Err(AppError::validation("from: must not be after to"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> ParcelCandidate {
        ParcelCandidate {
            user: Some(Uuid::new_v4()),
            phone: Some("555-1111".into()),
            parcel_type: Some("Document".into()),
            parcel_weight: Some(1.5),
            receiver_name: Some("Bob".into()),
            receiver_phone: Some("555-2222".into()),
            delivery_address: Some("1 Main St".into()),
            address_latitude: Some(23.8),
            address_longitude: Some(90.4),
            requested_delivery_date: Some(Utc::now()),
            price: Some(150.0),
            ..ParcelCandidate::default()
        }
    }

    #[test]
    fn omitted_optional_fields_get_defaults() {
        let parcel = candidate().normalize().unwrap();
        assert_eq!(parcel.rating, 0.0);
        assert_eq!(parcel.review, "");
        assert_eq!(parcel.booking_status, BookingStatus::Pending);
        assert_eq!(parcel.payment_status, PaymentStatus::Unpaid);
        assert!(parcel.delivery_man.is_none());
    }

    #[test]
    fn latitude_out_of_range_names_the_field() {
        let err = ParcelCandidate {
            address_latitude: Some(91.0),
            ..candidate()
        }
        .normalize()
        .unwrap_err();

        assert!(
            matches!(err, AppError::Validation(ref msg) if msg.starts_with("address_latitude:"))
        );
    }

    #[test]
    fn missing_fields_report_earliest_first() {
        let err = ParcelCandidate {
            receiver_name: None,
            price: None,
            ..candidate()
        }
        .normalize()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref msg) if msg == "receiver_name: is required"));
    }

    #[test]
    fn protected_fields_in_payload_are_ignored() {
        let user = Uuid::new_v4();
        let payload = serde_json::json!({
            "id": Uuid::new_v4(),
            "user": user,
            "name": "Jane",
            "email": "jane@example.com",
            "phone": "555-1111",
            "price": 20.0
        });

        let edit: ParcelEdit = serde_json::from_value(payload).unwrap();
        let (contact, changes) = edit.split().unwrap();

        assert_eq!(contact, Some((user, "555-1111".to_string())));
        assert_eq!(
            changes,
            ParcelChanges {
                price: Some(20.0),
                ..ParcelChanges::default()
            }
        );
    }

    #[test]
    fn phone_without_user_is_rejected() {
        let edit = ParcelEdit {
            phone: Some("555".into()),
            ..ParcelEdit::default()
        };
        assert!(matches!(edit.split(), Err(AppError::Validation(_))));
    }

    #[test]
    fn unknown_booking_status_is_rejected_on_input() {
        let parsed = serde_json::from_str::<BookingStatusChange>(r#"{"booking_status":"lost"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn inverted_date_range_is_invalid() {
        let now = Utc::now();
        let filter = ParcelFilter {
            from: Some(now),
            to: Some(now - chrono::Duration::days(1)),
            ..ParcelFilter::default()
        };
        assert!(filter.check().is_err());
    }
}
