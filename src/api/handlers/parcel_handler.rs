//! Parcel handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{
    AssignDeliveryMan, BookingStatusChange, Parcel, ParcelCandidate, ParcelEdit, ParcelFilter,
    ParcelReview, ParcelWithUser,
};
use crate::errors::AppResult;

/// Create parcel routes
pub fn parcel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parcels).post(book_parcel))
        .route("/:id", get(get_parcel).put(edit_parcel))
        .route("/:id/assign", patch(assign_delivery_man))
        .route("/:id/status", patch(update_booking_status))
        .route("/:id/review", patch(review_parcel))
}

/// List parcels with their senders
#[utoipa::path(
    get,
    path = "/parcels",
    tag = "Parcels",
    params(ParcelFilter),
    responses(
        (status = 200, description = "Matching parcels", body = Vec<ParcelWithUser>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_parcels(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<ParcelFilter>,
) -> AppResult<Json<Vec<ParcelWithUser>>> {
    let parcels = state.parcel_service.list_parcels(filter).await?;
    Ok(Json(parcels))
}

/// Get a parcel with its sender
#[utoipa::path(
    get,
    path = "/parcels/{id}",
    tag = "Parcels",
    params(
        ("id" = Uuid, Path, description = "Parcel ID")
    ),
    responses(
        (status = 200, description = "Parcel", body = ParcelWithUser),
        (status = 404, description = "Parcel not found")
    )
)]
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ParcelWithUser>> {
    let parcel = state.parcel_service.get_parcel(id).await?;
    Ok(Json(parcel))
}

/// Book a parcel; `phone` updates the sender in the same transaction
#[utoipa::path(
    post,
    path = "/parcels",
    tag = "Parcels",
    request_body = ParcelCandidate,
    responses(
        (status = 201, description = "Parcel booked", body = Parcel),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Transaction aborted, nothing was written")
    )
)]
pub async fn book_parcel(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ParcelCandidate>,
) -> AppResult<(StatusCode, Json<Parcel>)> {
    let parcel = state.parcel_service.book_parcel(payload).await?;
    Ok((StatusCode::CREATED, Json(parcel)))
}

/// Edit a parcel; `phone` updates the sender in the same transaction
#[utoipa::path(
    put,
    path = "/parcels/{id}",
    tag = "Parcels",
    params(
        ("id" = Uuid, Path, description = "Parcel ID")
    ),
    request_body = ParcelEdit,
    responses(
        (status = 200, description = "Parcel updated", body = Parcel),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parcel not found"),
        (status = 500, description = "Transaction aborted, nothing was written")
    )
)]
pub async fn edit_parcel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ParcelEdit>,
) -> AppResult<Json<Parcel>> {
    let parcel = state.parcel_service.edit_parcel(id, payload).await?;
    Ok(Json(parcel))
}

/// Assign a courier and mark the parcel on the way
#[utoipa::path(
    patch,
    path = "/parcels/{id}/assign",
    tag = "Parcels",
    params(
        ("id" = Uuid, Path, description = "Parcel ID")
    ),
    request_body = AssignDeliveryMan,
    responses(
        (status = 200, description = "Courier assigned", body = Parcel),
        (status = 400, description = "Unknown user or not a delivery man"),
        (status = 404, description = "Parcel not found")
    )
)]
pub async fn assign_delivery_man(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignDeliveryMan>,
) -> AppResult<Json<Parcel>> {
    let parcel = state.parcel_service.assign_delivery_man(id, payload).await?;
    Ok(Json(parcel))
}

/// Change the booking status
#[utoipa::path(
    patch,
    path = "/parcels/{id}/status",
    tag = "Parcels",
    params(
        ("id" = Uuid, Path, description = "Parcel ID")
    ),
    request_body = BookingStatusChange,
    responses(
        (status = 200, description = "Status changed", body = Parcel),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Parcel not found")
    )
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BookingStatusChange>,
) -> AppResult<Json<Parcel>> {
    let parcel = state.parcel_service.update_booking_status(id, payload).await?;
    Ok(Json(parcel))
}

/// Rate and review a parcel
#[utoipa::path(
    patch,
    path = "/parcels/{id}/review",
    tag = "Parcels",
    params(
        ("id" = Uuid, Path, description = "Parcel ID")
    ),
    request_body = ParcelReview,
    responses(
        (status = 200, description = "Review recorded", body = Parcel),
        (status = 400, description = "Rating outside [1, 5]"),
        (status = 404, description = "Parcel not found")
    )
)]
pub async fn review_parcel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ParcelReview>,
) -> AppResult<Json<Parcel>> {
    let parcel = state.parcel_service.review_parcel(id, payload).await?;
    Ok(Json(parcel))
}
