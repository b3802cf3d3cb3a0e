//! Parcel service - Booking workflow and parcel lifecycle.
//!
//! Booking and editing also update the sender's contact phone. Both writes
//! share one transaction: readers see the parcel and the new phone together
//! or neither of them.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::schema::required;
use crate::domain::{
    AssignDeliveryMan, BookingStatus, BookingStatusChange, Parcel, ParcelCandidate,
    ParcelChanges, ParcelEdit, ParcelFilter, ParcelReview, ParcelWithUser, Schema, User,
    UserChanges,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

/// Parcel service trait for dependency injection.
#[async_trait]
pub trait ParcelService: Send + Sync {
    /// List parcels with their senders
    async fn list_parcels(&self, filter: ParcelFilter) -> AppResult<Vec<ParcelWithUser>>;

    /// Get a parcel with its sender
    async fn get_parcel(&self, id: Uuid) -> AppResult<ParcelWithUser>;

    /// Book a parcel and update the sender's phone in one transaction
    async fn book_parcel(&self, candidate: ParcelCandidate) -> AppResult<Parcel>;

    /// Edit a parcel and update the sender's phone in one transaction
    async fn edit_parcel(&self, id: Uuid, edit: ParcelEdit) -> AppResult<Parcel>;

    /// Hand a parcel to a courier and mark it on the way
    async fn assign_delivery_man(
        &self,
        id: Uuid,
        assignment: AssignDeliveryMan,
    ) -> AppResult<Parcel>;

    /// Move a parcel through its booking lifecycle
    async fn update_booking_status(
        &self,
        id: Uuid,
        change: BookingStatusChange,
    ) -> AppResult<Parcel>;

    /// Record the sender's rating and review
    async fn review_parcel(&self, id: Uuid, review: ParcelReview) -> AppResult<Parcel>;
}

/// Concrete implementation of ParcelService using Unit of Work.
pub struct ParcelManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ParcelManager<U> {
    /// Create new parcel service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn missing_reference(field: &str) -> AppError {
    AppError::validation(format!("{}: referenced user does not exist", field))
}

/// Write the sender's phone inside the session.
async fn update_contact(
    ctx: &TransactionContext<'_>,
    user: Uuid,
    phone: String,
) -> AppResult<()> {
    match ctx.users().update(user, UserChanges::phone(phone)).await {
        Ok(_) => Ok(()),
        Err(AppError::NotFound) => Err(missing_reference("user")),
        Err(e) => Err(e),
    }
}

/// Referenced users must exist when the parcel is written, and a courier
/// must hold the `delivery_man` status.
async fn ensure_references(
    ctx: &TransactionContext<'_>,
    user: Option<Uuid>,
    delivery_man: Option<Uuid>,
) -> AppResult<()> {
    if let Some(id) = user {
        if ctx.users().find_by_id(id).await?.is_none() {
            return Err(missing_reference("user"));
        }
    }
    if let Some(id) = delivery_man {
        let courier = ctx
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| missing_reference("delivery_man"))?;
        ensure_courier(&courier)?;
    }
    Ok(())
}

fn ensure_courier(user: &User) -> AppResult<()> {
    if user.is_delivery_man() {
        Ok(())
    } else {
        Err(AppError::validation("delivery_man: user is not a delivery man"))
    }
}

/// Collapse a failed session into what callers may see.
///
/// Caller mistakes and a missing edit target keep their kind; store faults
/// become an opaque `Transaction` error.
fn session_failure(err: AppError) -> AppError {
    match err {
        AppError::Validation(_)
        | AppError::BadRequest(_)
        | AppError::NotFound
        | AppError::Transaction(_) => err,
        AppError::Database(e) => AppError::transaction(e.to_string()),
        other => AppError::transaction(other.to_string()),
    }
}

#[async_trait]
impl<U: UnitOfWork> ParcelService for ParcelManager<U> {
    async fn list_parcels(&self, filter: ParcelFilter) -> AppResult<Vec<ParcelWithUser>> {
        filter.check()?;
        self.uow.parcels().list(filter).await
    }

    async fn get_parcel(&self, id: Uuid) -> AppResult<ParcelWithUser> {
        self.uow.parcels().find_by_id(id).await?.ok_or_not_found()
    }

    async fn book_parcel(&self, candidate: ParcelCandidate) -> AppResult<Parcel> {
        let sender = required(candidate.user, "user")?;

        let parcel = with_transaction!(self.uow, |ctx| {
            if let Some(phone) = candidate.phone.clone() {
                update_contact(&ctx, sender, phone).await?;
            }

            let parcel = candidate.normalize()?;
            ensure_references(&ctx, Some(parcel.user), parcel.delivery_man).await?;
            let created = ctx.parcels().create(parcel).await?;
            Ok(created)
        })
        .map_err(session_failure)?;

        tracing::info!(parcel_id = %parcel.id, user_id = %parcel.user, "Parcel booked");
        Ok(parcel)
    }

    async fn edit_parcel(&self, id: Uuid, edit: ParcelEdit) -> AppResult<Parcel> {
        let parcel = with_transaction!(self.uow, |ctx| {
            if let (Some(user), Some(phone)) = (edit.user, edit.phone.clone()) {
                update_contact(&ctx, user, phone).await?;
            }

            let (_, changes) = edit.split()?;
            ensure_references(&ctx, None, changes.delivery_man).await?;
            let updated = ctx.parcels().update(id, changes).await?;
            Ok(updated)
        })
        .map_err(session_failure)?;

        tracing::info!(parcel_id = %parcel.id, "Parcel edited");
        Ok(parcel)
    }

    async fn assign_delivery_man(
        &self,
        id: Uuid,
        assignment: AssignDeliveryMan,
    ) -> AppResult<Parcel> {
        assignment.check()?;

        let courier = self
            .uow
            .users()
            .find_by_id(assignment.delivery_man)
            .await?
            .ok_or_else(|| missing_reference("delivery_man"))?;

        ensure_courier(&courier)?;

        let changes = ParcelChanges {
            delivery_man: Some(courier.id),
            approximate_delivery_date: assignment.approximate_delivery_date,
            booking_status: Some(BookingStatus::OnTheWay),
            ..ParcelChanges::default()
        };

        self.uow.parcels().update(id, changes).await
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        change: BookingStatusChange,
    ) -> AppResult<Parcel> {
        let status = change.booking_status;
        let changes = ParcelChanges {
            booking_status: Some(status),
            delivery_date: (status == BookingStatus::Delivered).then(Utc::now),
            ..ParcelChanges::default()
        };

        self.uow.parcels().update(id, changes).await
    }

    async fn review_parcel(&self, id: Uuid, review: ParcelReview) -> AppResult<Parcel> {
        review.check()?;

        let changes = ParcelChanges {
            rating: Some(review.rating),
            review: Some(review.review),
            review_giving_date: Some(Utc::now()),
            ..ParcelChanges::default()
        };

        self.uow.parcels().update(id, changes).await
    }
}
