//! Read-only aggregation queries behind the dashboard.
//!
//! Every view is a single grouped statement over `users LEFT JOIN parcels`;
//! only the aggregated rows leave the database.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use super::entities::parcel::{self, Entity as ParcelEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::config::{
    BOOKING_DELIVERED, STATUS_DELIVERY_MAN, STATUS_USER, TIME_SERIES_FORMAT_POSTGRES,
    TIME_SERIES_FORMAT_STRFTIME,
};
use crate::domain::{
    BookingStatus, BookingVolume, DeliveryManLedgerEntry, UserLedgerEntry, UserStatus,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Aggregation queries for dashboards.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Count parcels, optionally only those in one booking state
    async fn count_parcels(&self, status: Option<BookingStatus>) -> AppResult<u64>;

    /// Count users, optionally only those with one status
    async fn count_users(&self, status: Option<UserStatus>) -> AppResult<u64>;

    /// One page of senders with their booking totals, in insertion order
    async fn user_ledger(&self, offset: u64, limit: u64) -> AppResult<Vec<UserLedgerEntry>>;

    /// Every courier with delivery count and average rating, in insertion order
    async fn delivery_man_ledger(&self) -> AppResult<Vec<DeliveryManLedgerEntry>>;

    /// Couriers ranked by delivered count then average rating
    async fn top_performers(&self, limit: u64) -> AppResult<Vec<DeliveryManLedgerEntry>>;

    /// Booking counts per calendar day of `booking_date`
    async fn booking_time_series(&self) -> AppResult<Vec<BookingVolume>>;
}

#[derive(Debug, FromQueryResult)]
struct UserLedgerRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    photo: String,
    booked: i64,
    total_price: f64,
}

impl From<UserLedgerRow> for UserLedgerEntry {
    fn from(row: UserLedgerRow) -> Self {
        UserLedgerEntry {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            photo: row.photo,
            booked: row.booked,
            total_price: row.total_price,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct DeliveryManRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    photo: String,
    delivered: i64,
    avg_rating: f64,
}

impl From<DeliveryManRow> for DeliveryManLedgerEntry {
    fn from(row: DeliveryManRow) -> Self {
        DeliveryManLedgerEntry {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            photo: row.photo,
            delivered: row.delivered,
            avg_rating: row.avg_rating,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct BookingVolumeRow {
    x: String,
    y: i64,
}

/// Concrete implementation of AnalyticsRepository
pub struct AnalyticsStore {
    db: DatabaseConnection,
}

impl AnalyticsStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Couriers joined to their assigned parcels with the two metrics selected
    fn courier_metrics() -> Select<UserEntity> {
        let status = Expr::col((ParcelEntity, parcel::Column::BookingStatus));
        let rating = Expr::col((ParcelEntity, parcel::Column::Rating));

        let delivered = Func::coalesce([
            SimpleExpr::from(Func::sum(
                Expr::case(status.eq(BOOKING_DELIVERED), 1).finally(0),
            )),
            Expr::val(0).into(),
        ]);
        // Zero ratings mean "not rated"; a NULL branch keeps them out of the mean
        let avg_rating = Func::coalesce([
            SimpleExpr::from(Func::avg(Expr::case(rating.clone().ne(0.0), rating))),
            Expr::val(0.0).into(),
        ]);

        profile_columns(UserEntity::find())
            .column_as(SimpleExpr::from(delivered), "delivered")
            .column_as(SimpleExpr::from(avg_rating), "avg_rating")
            .join(JoinType::LeftJoin, parcel::Relation::Courier.def().rev())
            .filter(user::Column::Status.eq(STATUS_DELIVERY_MAN))
            .group_by(user::Column::Id)
    }
}

/// Select only the public profile columns of a user
fn profile_columns(query: Select<UserEntity>) -> Select<UserEntity> {
    query
        .select_only()
        .column(user::Column::Id)
        .column(user::Column::Name)
        .column(user::Column::Email)
        .column(user::Column::Phone)
        .column(user::Column::Photo)
}

/// Calendar day of `parcels.booking_date`, rendered `MM-DD-YYYY` by the backend
fn booking_day(backend: DbBackend) -> SimpleExpr {
    let sql = match backend {
        DbBackend::Postgres => format!(
            r#"to_char("parcels"."booking_date" AT TIME ZONE 'UTC', '{}')"#,
            TIME_SERIES_FORMAT_POSTGRES
        ),
        DbBackend::MySql => format!(
            "DATE_FORMAT(`parcels`.`booking_date`, '{}')",
            TIME_SERIES_FORMAT_STRFTIME
        ),
        DbBackend::Sqlite => format!(
            r#"strftime('{}', "parcels"."booking_date")"#,
            TIME_SERIES_FORMAT_STRFTIME
        ),
    };
    Expr::cust(sql)
}

#[async_trait]
impl AnalyticsRepository for AnalyticsStore {
    async fn count_parcels(&self, status: Option<BookingStatus>) -> AppResult<u64> {
        let mut query = ParcelEntity::find();
        if let Some(status) = status {
            query = query.filter(parcel::Column::BookingStatus.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(AppError::from)
    }

    async fn count_users(&self, status: Option<UserStatus>) -> AppResult<u64> {
        let mut query = UserEntity::find();
        if let Some(status) = status {
            query = query.filter(user::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(AppError::from)
    }

    async fn user_ledger(&self, offset: u64, limit: u64) -> AppResult<Vec<UserLedgerEntry>> {
        let total_price = Func::coalesce([
            SimpleExpr::from(Func::sum(Expr::col((ParcelEntity, parcel::Column::Price)))),
            Expr::val(0.0).into(),
        ]);

        let rows = profile_columns(UserEntity::find())
            .column_as(
                SimpleExpr::from(Func::count(Expr::col((ParcelEntity, parcel::Column::Id)))),
                "booked",
            )
            .column_as(SimpleExpr::from(total_price), "total_price")
            .join(JoinType::LeftJoin, parcel::Relation::Sender.def().rev())
            .filter(user::Column::Status.eq(STATUS_USER))
            .group_by(user::Column::Id)
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .into_model::<UserLedgerRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(UserLedgerEntry::from).collect())
    }

    async fn delivery_man_ledger(&self) -> AppResult<Vec<DeliveryManLedgerEntry>> {
        let rows = Self::courier_metrics()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .into_model::<DeliveryManRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(DeliveryManLedgerEntry::from).collect())
    }

    async fn top_performers(&self, limit: u64) -> AppResult<Vec<DeliveryManLedgerEntry>> {
        let rows = Self::courier_metrics()
            .order_by_desc(Expr::cust("delivered"))
            .order_by_desc(Expr::cust("avg_rating"))
            .order_by_asc(user::Column::CreatedAt)
            .limit(limit)
            .into_model::<DeliveryManRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(DeliveryManLedgerEntry::from).collect())
    }

    async fn booking_time_series(&self) -> AppResult<Vec<BookingVolume>> {
        let day = booking_day(self.db.get_database_backend());

        let rows = ParcelEntity::find()
            .select_only()
            .column_as(day.clone(), "x")
            .column_as(
                SimpleExpr::from(Func::count(Expr::col((ParcelEntity, parcel::Column::Id)))),
                "y",
            )
            .group_by(day)
            .into_model::<BookingVolumeRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| BookingVolume { x: row.x, y: row.y })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    #[test]
    fn courier_metrics_exclude_zero_ratings_from_the_mean() {
        let sql = AnalyticsStore::courier_metrics()
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "parcels" ON "users"."id" = "parcels"."delivery_man_id""#));
        assert!(sql.contains(r#""parcels"."rating" <> "#));
        assert!(sql.contains(r#"AVG((CASE WHEN ("parcels"."rating" <> "#));
        assert!(sql.contains(r#"THEN "parcels"."rating" END))"#));
        assert!(sql.contains(r#"GROUP BY "users"."id""#));
    }

    #[test]
    fn booking_day_follows_backend_dialect() {
        let postgres = format!("{:?}", booking_day(DbBackend::Postgres));
        let sqlite = format!("{:?}", booking_day(DbBackend::Sqlite));

        assert!(postgres.contains("to_char"));
        assert!(postgres.contains("MM-DD-YYYY"));
        assert!(sqlite.contains("strftime('%m-%d-%Y'"));
    }
}
