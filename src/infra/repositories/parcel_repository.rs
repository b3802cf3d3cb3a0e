//! Parcel repository implementation.
//!
//! Reads resolve the sender inline through the `parcels.user_id` relation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::parcel::{self, ActiveModel, Entity as ParcelEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{NewParcel, Parcel, ParcelChanges, ParcelFilter, ParcelWithUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Parcel repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// Find parcel by ID with its sender
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ParcelWithUser>>;

    /// List parcels matching the filter, oldest booking first
    async fn list(&self, filter: ParcelFilter) -> AppResult<Vec<ParcelWithUser>>;

    /// Insert a normalized parcel
    async fn create(&self, parcel: NewParcel) -> AppResult<Parcel>;

    /// Apply a partial update and refresh `last_updated_date`
    async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel>;
}

/// Concrete implementation of ParcelRepository
pub struct ParcelStore {
    db: DatabaseConnection,
}

impl ParcelStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParcelRepository for ParcelStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ParcelWithUser>> {
        find_by_id(&self.db, id).await
    }

    async fn list(&self, filter: ParcelFilter) -> AppResult<Vec<ParcelWithUser>> {
        let mut query = ParcelEntity::find();

        if let Some(status) = filter.booking_status {
            query = query.filter(parcel::Column::BookingStatus.eq(status.as_str()));
        }
        if let Some(sender) = filter.user {
            query = query.filter(parcel::Column::UserId.eq(sender));
        }
        if let Some(courier) = filter.delivery_man {
            query = query.filter(parcel::Column::DeliveryManId.eq(courier));
        }
        if let Some(from) = filter.from {
            query = query.filter(parcel::Column::RequestedDeliveryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(parcel::Column::RequestedDeliveryDate.lte(to));
        }

        let rows = query
            .find_also_related(UserEntity)
            .order_by_asc(parcel::Column::BookingDate)
            .order_by_asc(parcel::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(with_owner).collect())
    }

    async fn create(&self, parcel: NewParcel) -> AppResult<Parcel> {
        create(&self.db, parcel).await
    }

    async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel> {
        update(&self.db, id, changes).await
    }
}

fn with_owner((parcel, owner): (parcel::Model, Option<user::Model>)) -> ParcelWithUser {
    ParcelWithUser {
        parcel: Parcel::from(parcel),
        owner: owner.map(User::from),
    }
}

// Connection-generic queries, shared with the transaction-scoped repository.

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<ParcelWithUser>> {
    let row = ParcelEntity::find_by_id(id)
        .find_also_related(UserEntity)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(with_owner))
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, parcel: NewParcel) -> AppResult<Parcel> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(parcel.user),
        delivery_man_id: Set(parcel.delivery_man),
        parcel_type: Set(parcel.parcel_type),
        parcel_weight: Set(parcel.parcel_weight),
        receiver_name: Set(parcel.receiver_name),
        receiver_phone: Set(parcel.receiver_phone),
        delivery_address: Set(parcel.delivery_address),
        address_latitude: Set(parcel.address_latitude),
        address_longitude: Set(parcel.address_longitude),
        requested_delivery_date: Set(parcel.requested_delivery_date),
        delivery_date: Set(None),
        approximate_delivery_date: Set(parcel.approximate_delivery_date),
        price: Set(parcel.price),
        booking_status: Set(parcel.booking_status.as_str().to_string()),
        payment_status: Set(parcel.payment_status.as_str().to_string()),
        rating: Set(parcel.rating),
        review: Set(parcel.review),
        review_giving_date: Set(None),
        booking_date: Set(now),
        last_updated_date: Set(now),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    Ok(Parcel::from(model))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: ParcelChanges,
) -> AppResult<Parcel> {
    let parcel = ParcelEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = parcel.into();

    if let Some(courier) = changes.delivery_man {
        active.delivery_man_id = Set(Some(courier));
    }
    if let Some(parcel_type) = changes.parcel_type {
        active.parcel_type = Set(parcel_type);
    }
    if let Some(weight) = changes.parcel_weight {
        active.parcel_weight = Set(weight);
    }
    if let Some(name) = changes.receiver_name {
        active.receiver_name = Set(name);
    }
    if let Some(phone) = changes.receiver_phone {
        active.receiver_phone = Set(phone);
    }
    if let Some(address) = changes.delivery_address {
        active.delivery_address = Set(address);
    }
    if let Some(latitude) = changes.address_latitude {
        active.address_latitude = Set(latitude);
    }
    if let Some(longitude) = changes.address_longitude {
        active.address_longitude = Set(longitude);
    }
    if let Some(date) = changes.requested_delivery_date {
        active.requested_delivery_date = Set(date);
    }
    if let Some(date) = changes.delivery_date {
        active.delivery_date = Set(Some(date));
    }
    if let Some(date) = changes.approximate_delivery_date {
        active.approximate_delivery_date = Set(Some(date));
    }
    if let Some(price) = changes.price {
        active.price = Set(price);
    }
    if let Some(status) = changes.booking_status {
        active.booking_status = Set(status.as_str().to_string());
    }
    if let Some(status) = changes.payment_status {
        active.payment_status = Set(status.as_str().to_string());
    }
    if let Some(rating) = changes.rating {
        active.rating = Set(rating);
    }
    if let Some(review) = changes.review {
        active.review = Set(review);
    }
    if let Some(date) = changes.review_giving_date {
        active.review_giving_date = Set(Some(date));
    }
    active.last_updated_date = Set(Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(Parcel::from(model))
}
