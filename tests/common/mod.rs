//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations applied.
//! The pool holds a single connection so all queries see the same database.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as Days, Utc};
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use parcel_tracker::domain::{NewUser, ParcelCandidate, User, UserStatus};
use parcel_tracker::infra::{Migrator, Persistence, UserRepository, UserStore};

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fresh migrated in-memory database
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = SeaDatabase::connect(options)
        .await
        .expect("in-memory sqlite should open");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");
    db
}

pub fn persistence(db: &DatabaseConnection) -> Arc<Persistence> {
    Arc::new(Persistence::new(db.clone(), TEST_TIMEOUT))
}

pub async fn seed_user(db: &DatabaseConnection, name: &str, status: UserStatus) -> User {
    UserStore::new(db.clone())
        .create(NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            status,
            phone: String::new(),
            photo: String::new(),
        })
        .await
        .expect("user should insert")
}

pub async fn fetch_user(db: &DatabaseConnection, id: Uuid) -> User {
    UserStore::new(db.clone())
        .find_by_id(id)
        .await
        .expect("lookup should succeed")
        .expect("user should exist")
}

/// A complete booking for `user`, without a contact phone
pub fn parcel_candidate(user: Uuid) -> ParcelCandidate {
    ParcelCandidate {
        user: Some(user),
        parcel_type: Some("Document".into()),
        parcel_weight: Some(1.5),
        receiver_name: Some("Bob".into()),
        receiver_phone: Some("555-2222".into()),
        delivery_address: Some("1 Main St".into()),
        address_latitude: Some(23.8),
        address_longitude: Some(90.4),
        requested_delivery_date: Some(Utc::now() + Days::days(3)),
        price: Some(150.0),
        ..ParcelCandidate::default()
    }
}
