//! Dashboard aggregations over a seeded database.

mod common;

use chrono::Duration as Days;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement, Value};
use uuid::Uuid;

use parcel_tracker::domain::{
    AssignDeliveryMan, BookingStatus, BookingStatusChange, DeliveryManLedgerEntry,
    ParcelCandidate, ParcelReview, UserStatus,
};
use parcel_tracker::infra::Persistence;
use parcel_tracker::services::{DashboardManager, DashboardService, ParcelManager, ParcelService};
use parcel_tracker::types::PageQuery;

use common::{connect, parcel_candidate, persistence, seed_user};

struct Fleet {
    alice: Uuid,
    bob: Uuid,
    carol: Uuid,
    dave: Uuid,
    erin: Uuid,
    frank: Uuid,
    gina: Uuid,
}

async fn deliver(
    parcels: &ParcelManager<Persistence>,
    sender: Uuid,
    courier: Uuid,
    price: f64,
    rating: Option<f64>,
) {
    let parcel = parcels
        .book_parcel(ParcelCandidate {
            price: Some(price),
            ..parcel_candidate(sender)
        })
        .await
        .unwrap();
    parcels
        .assign_delivery_man(
            parcel.id,
            AssignDeliveryMan {
                delivery_man: courier,
                approximate_delivery_date: None,
            },
        )
        .await
        .unwrap();
    parcels
        .update_booking_status(
            parcel.id,
            BookingStatusChange {
                booking_status: BookingStatus::Delivered,
            },
        )
        .await
        .unwrap();
    if let Some(rating) = rating {
        parcels
            .review_parcel(
                parcel.id,
                ParcelReview {
                    rating,
                    review: String::new(),
                },
            )
            .await
            .unwrap();
    }
}

/// Three senders, four couriers and one admin.
///
/// Dave delivers two parcels (one rated 4, one unrated), Erin one rated 5,
/// Gina one rated 3 and Frank none. Carol never books.
async fn seed_fleet(db: &DatabaseConnection) -> Fleet {
    let fleet = Fleet {
        alice: seed_user(db, "Alice", UserStatus::User).await.id,
        bob: seed_user(db, "Bob", UserStatus::User).await.id,
        carol: seed_user(db, "Carol", UserStatus::User).await.id,
        dave: seed_user(db, "Dave", UserStatus::DeliveryMan).await.id,
        erin: seed_user(db, "Erin", UserStatus::DeliveryMan).await.id,
        frank: seed_user(db, "Frank", UserStatus::DeliveryMan).await.id,
        gina: seed_user(db, "Gina", UserStatus::DeliveryMan).await.id,
    };
    seed_user(db, "Zed", UserStatus::Admin).await;

    let parcels = ParcelManager::new(persistence(db));
    deliver(&parcels, fleet.alice, fleet.dave, 150.0, Some(4.0)).await;
    deliver(&parcels, fleet.alice, fleet.dave, 50.0, None).await;
    deliver(&parcels, fleet.bob, fleet.erin, 80.0, Some(5.0)).await;
    deliver(&parcels, fleet.bob, fleet.gina, 20.0, Some(3.0)).await;

    fleet
}

fn dashboard(db: &DatabaseConnection) -> DashboardManager<Persistence> {
    DashboardManager::new(persistence(db))
}

fn courier(entries: &[DeliveryManLedgerEntry], id: Uuid) -> &DeliveryManLedgerEntry {
    entries
        .iter()
        .find(|entry| entry.id == id)
        .expect("courier should be listed")
}

#[tokio::test]
async fn summary_counts_parcels_and_users() {
    let db = connect().await;
    seed_fleet(&db).await;

    let summary = dashboard(&db).fleet_summary().await.unwrap();

    assert_eq!(summary.booked, 4);
    assert_eq!(summary.delivered, 4);
    assert_eq!(summary.registered, 8);
}

#[tokio::test]
async fn empty_store_has_zero_summary_and_no_series() {
    let db = connect().await;
    let service = dashboard(&db);

    let summary = service.fleet_summary().await.unwrap();
    assert_eq!((summary.booked, summary.delivered, summary.registered), (0, 0, 0));
    assert!(service.booking_time_series().await.unwrap().is_empty());
    assert!(service.top_performers().await.unwrap().is_empty());
}

#[tokio::test]
async fn user_ledger_totals_bookings_per_sender() {
    let db = connect().await;
    let fleet = seed_fleet(&db).await;

    let page = dashboard(&db).user_ledger(PageQuery::default()).await.unwrap();

    assert_eq!(page.total_count, 3);
    assert_eq!(page.data.len(), 3);

    let row = |id: Uuid| {
        page.data
            .iter()
            .find(|entry| entry.id == id)
            .expect("sender should be listed")
    };
    assert_eq!(row(fleet.alice).booked, 2);
    assert_eq!(row(fleet.alice).total_price, 200.0);
    assert_eq!(row(fleet.bob).booked, 2);
    assert_eq!(row(fleet.bob).total_price, 100.0);
    assert_eq!(row(fleet.carol).booked, 0);
    assert_eq!(row(fleet.carol).total_price, 0.0);
    assert!(page.data.iter().all(|entry| entry.id != fleet.dave));
}

#[tokio::test]
async fn user_ledger_pages_by_five_with_stable_total() {
    let db = connect().await;
    for name in ["U1", "U2", "U3", "U4", "U5", "U6", "U7"] {
        seed_user(&db, name, UserStatus::User).await;
    }
    seed_user(&db, "Courier", UserStatus::DeliveryMan).await;
    let service = dashboard(&db);

    let first = service.user_ledger(PageQuery::new(0)).await.unwrap();
    let second = service.user_ledger(PageQuery::new(1)).await.unwrap();
    let third = service.user_ledger(PageQuery::new(2)).await.unwrap();

    assert_eq!(first.data.len(), 5);
    assert_eq!(second.data.len(), 2);
    assert!(third.data.is_empty());
    for page in [&first, &second, &third] {
        assert_eq!(page.total_count, 7);
    }

    let mut ids: Vec<Uuid> = first
        .data
        .iter()
        .chain(second.data.iter())
        .map(|entry| entry.id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 7);
}

#[tokio::test]
async fn courier_ledger_ignores_unrated_parcels_in_average() {
    let db = connect().await;
    let fleet = seed_fleet(&db).await;

    let ledger = dashboard(&db).delivery_man_ledger().await.unwrap();

    assert_eq!(ledger.len(), 4);
    assert_eq!(courier(&ledger, fleet.dave).delivered, 2);
    assert_eq!(courier(&ledger, fleet.dave).avg_rating, 4.0);
    assert_eq!(courier(&ledger, fleet.erin).delivered, 1);
    assert_eq!(courier(&ledger, fleet.erin).avg_rating, 5.0);
    assert_eq!(courier(&ledger, fleet.frank).delivered, 0);
    assert_eq!(courier(&ledger, fleet.frank).avg_rating, 0.0);
}

#[tokio::test]
async fn top_performers_rank_by_deliveries_then_rating() {
    let db = connect().await;
    let fleet = seed_fleet(&db).await;

    let ranked: Vec<Uuid> = dashboard(&db)
        .top_performers()
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();

    assert_eq!(ranked, vec![fleet.dave, fleet.erin, fleet.gina, fleet.frank]);
}

#[tokio::test]
async fn top_performers_are_capped_at_five() {
    let db = connect().await;
    for name in ["C1", "C2", "C3", "C4", "C5", "C6"] {
        seed_user(&db, name, UserStatus::DeliveryMan).await;
    }

    let ranked = dashboard(&db).top_performers().await.unwrap();

    assert_eq!(ranked.len(), 5);
}

#[tokio::test]
async fn bookings_on_the_same_day_share_a_bucket() {
    let db = connect().await;
    let sender = seed_user(&db, "Alice", UserStatus::User).await;
    let parcels = ParcelManager::new(persistence(&db));

    let first = parcels.book_parcel(parcel_candidate(sender.id)).await.unwrap();
    let second = parcels.book_parcel(parcel_candidate(sender.id)).await.unwrap();

    let series = dashboard(&db).booking_time_series().await.unwrap();

    let day = first.booking_date.format("%m-%d-%Y").to_string();
    if second.booking_date.date_naive() == first.booking_date.date_naive() {
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].x, day);
        assert_eq!(series[0].y, 2);
    } else {
        // Booked across midnight
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|point| point.y == 1));
    }
}

#[tokio::test]
async fn bookings_on_different_days_get_separate_buckets() {
    let db = connect().await;
    let sender = seed_user(&db, "Alice", UserStatus::User).await;
    let parcels = ParcelManager::new(persistence(&db));

    let recent = parcels.book_parcel(parcel_candidate(sender.id)).await.unwrap();
    let older = parcels.book_parcel(parcel_candidate(sender.id)).await.unwrap();

    // booking_date is immutable through the services
    let backdated = older.booking_date - Days::days(2);
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "UPDATE parcels SET booking_date = ? WHERE id = ?",
        [Value::from(backdated), Value::from(older.id)],
    ))
    .await
    .unwrap();

    let mut series = dashboard(&db).booking_time_series().await.unwrap();
    series.sort_by(|a, b| a.x.cmp(&b.x));

    let mut expected = vec![
        (backdated.format("%m-%d-%Y").to_string(), 1),
        (recent.booking_date.format("%m-%d-%Y").to_string(), 1),
    ];
    expected.sort();
    let actual: Vec<(String, i64)> = series.into_iter().map(|point| (point.x, point.y)).collect();

    assert_eq!(actual, expected);
}
