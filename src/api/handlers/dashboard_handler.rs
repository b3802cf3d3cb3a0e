//! Dashboard handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::ValidatedQuery;
use crate::api::AppState;
use crate::domain::{BookingVolume, DeliveryManLedgerEntry, FleetSummary};
use crate::errors::AppResult;
use crate::types::{PageQuery, UserLedgerPage};

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(fleet_summary))
        .route("/users", get(user_ledger))
        .route("/delivery-men", get(delivery_man_ledger))
        .route("/top-delivery-men", get(top_performers))
        .route("/bookings-by-date", get(booking_time_series))
}

/// Booked, delivered and registered totals
#[utoipa::path(
    get,
    path = "/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Headline counts", body = FleetSummary)
    )
)]
pub async fn fleet_summary(State(state): State<AppState>) -> AppResult<Json<FleetSummary>> {
    let summary = state.dashboard_service.fleet_summary().await?;
    Ok(Json(summary))
}

/// Senders with booking totals, five per page
#[utoipa::path(
    get,
    path = "/dashboard/users",
    tag = "Dashboard",
    params(PageQuery),
    responses(
        (status = 200, description = "One ledger page", body = UserLedgerPage),
        (status = 400, description = "Invalid page")
    )
)]
pub async fn user_ledger(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PageQuery>,
) -> AppResult<Json<UserLedgerPage>> {
    let ledger = state.dashboard_service.user_ledger(page).await?;
    Ok(Json(ledger))
}

/// Couriers with delivered count and average rating
#[utoipa::path(
    get,
    path = "/dashboard/delivery-men",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Courier ledger", body = Vec<DeliveryManLedgerEntry>)
    )
)]
pub async fn delivery_man_ledger(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DeliveryManLedgerEntry>>> {
    let ledger = state.dashboard_service.delivery_man_ledger().await?;
    Ok(Json(ledger))
}

/// Top five couriers
#[utoipa::path(
    get,
    path = "/dashboard/top-delivery-men",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Ranked couriers", body = Vec<DeliveryManLedgerEntry>)
    )
)]
pub async fn top_performers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DeliveryManLedgerEntry>>> {
    let ranked = state.dashboard_service.top_performers().await?;
    Ok(Json(ranked))
}

/// Bookings per calendar day
#[utoipa::path(
    get,
    path = "/dashboard/bookings-by-date",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Time series points", body = Vec<BookingVolume>)
    )
)]
pub async fn booking_time_series(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookingVolume>>> {
    let series = state.dashboard_service.booking_time_series().await?;
    Ok(Json(series))
}
