//! Migration: Create parcels table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parcels::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parcels::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Parcels::UserId).uuid().not_null())
                    .col(ColumnDef::new(Parcels::DeliveryManId).uuid().null())
                    .col(ColumnDef::new(Parcels::ParcelType).string().not_null())
                    .col(ColumnDef::new(Parcels::ParcelWeight).double().not_null())
                    .col(ColumnDef::new(Parcels::ReceiverName).string().not_null())
                    .col(ColumnDef::new(Parcels::ReceiverPhone).string().not_null())
                    .col(ColumnDef::new(Parcels::DeliveryAddress).string().not_null())
                    .col(ColumnDef::new(Parcels::AddressLatitude).double().not_null())
                    .col(ColumnDef::new(Parcels::AddressLongitude).double().not_null())
                    .col(
                        ColumnDef::new(Parcels::RequestedDeliveryDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parcels::DeliveryDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Parcels::ApproximateDeliveryDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Parcels::Price).double().not_null())
                    .col(
                        ColumnDef::new(Parcels::BookingStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Parcels::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(
                        ColumnDef::new(Parcels::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Parcels::Review).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Parcels::ReviewGivingDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Parcels::BookingDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parcels::LastUpdatedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parcels_user_id")
                            .from(Parcels::Table, Parcels::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parcels_delivery_man_id")
                            .from(Parcels::Table, Parcels::DeliveryManId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Join keys of the ledgers
        for (name, column) in [
            ("idx_parcels_user_id", Parcels::UserId),
            ("idx_parcels_delivery_man_id", Parcels::DeliveryManId),
            ("idx_parcels_booking_status", Parcels::BookingStatus),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Parcels::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parcels::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Parcels {
    Table,
    Id,
    UserId,
    DeliveryManId,
    ParcelType,
    ParcelWeight,
    ReceiverName,
    ReceiverPhone,
    DeliveryAddress,
    AddressLatitude,
    AddressLongitude,
    RequestedDeliveryDate,
    DeliveryDate,
    ApproximateDeliveryDate,
    Price,
    BookingStatus,
    PaymentStatus,
    Rating,
    Review,
    ReviewGivingDate,
    BookingDate,
    LastUpdatedDate,
}
