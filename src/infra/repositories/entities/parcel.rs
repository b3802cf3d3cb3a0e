//! Parcel database entity for SeaORM.
//!
//! A parcel references users twice: the sender (`user_id`) and the
//! optional courier (`delivery_man_id`).

use sea_orm::entity::prelude::*;

use crate::domain::{BookingStatus, Parcel, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parcels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub delivery_man_id: Option<Uuid>,
    pub parcel_type: String,
    pub parcel_weight: f64,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub delivery_address: String,
    pub address_latitude: f64,
    pub address_longitude: f64,
    pub requested_delivery_date: DateTimeUtc,
    pub delivery_date: Option<DateTimeUtc>,
    pub approximate_delivery_date: Option<DateTimeUtc>,
    pub price: f64,
    pub booking_status: String,
    pub payment_status: String,
    pub rating: f64,
    pub review: String,
    pub review_giving_date: Option<DateTimeUtc>,
    pub booking_date: DateTimeUtc,
    pub last_updated_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DeliveryManId",
        to = "super::user::Column::Id"
    )]
    Courier,
}

/// `find_also_related(user::Entity)` resolves the sender
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Parcel {
    fn from(model: Model) -> Self {
        Parcel {
            id: model.id,
            user: model.user_id,
            delivery_man: model.delivery_man_id,
            parcel_type: model.parcel_type,
            parcel_weight: model.parcel_weight,
            receiver_name: model.receiver_name,
            receiver_phone: model.receiver_phone,
            delivery_address: model.delivery_address,
            address_latitude: model.address_latitude,
            address_longitude: model.address_longitude,
            requested_delivery_date: model.requested_delivery_date,
            delivery_date: model.delivery_date,
            approximate_delivery_date: model.approximate_delivery_date,
            price: model.price,
            booking_status: BookingStatus::from(model.booking_status.as_str()),
            payment_status: PaymentStatus::from(model.payment_status.as_str()),
            rating: model.rating,
            review: model.review,
            review_giving_date: model.review_giving_date,
            booking_date: model.booking_date,
            last_updated_date: model.last_updated_date,
        }
    }
}
