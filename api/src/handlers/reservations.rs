//! Reservation handlers
//!
//! Booking, cancellation and reservation listings.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use crate::domain::entities::{Identity, Reservation, ReservationId, VenueId};
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Request to book a table
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    /// ISO-8601 timestamp; a value without offset is taken as UTC
    pub requested_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub venue_id: VenueId,
    pub table_number: i32,
    pub capacity: i32,
    pub layout: String,
    pub identity: String,
    pub requested_time: String,
    pub slot_date: NaiveDate,
    pub created_at: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            reservation_id: r.id,
            venue_id: r.venue_id,
            table_number: r.table_number,
            capacity: r.capacity,
            layout: r.layout,
            identity: r.identity.0,
            requested_time: r.requested_time.to_rfc3339(),
            slot_date: r.slot_date,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// POST /venues/:venue_id/tables/:table_number/reservations
pub async fn reserve(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath((venue_id, table_number)): AppPath<(Uuid, i32)>,
    AppJson(request): AppJson<ReserveRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let requested_time = request.requested_time.ok_or_else(|| {
        DomainError::InvalidArgument("requested_time is required".to_string())
    })?;

    let reservation = state
        .reservation_service
        .reserve(&VenueId(venue_id), table_number, &identity, &requested_time)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// GET /reservations
///
/// The caller's reservations, earliest first.
pub async fn list_my_reservations(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let reservations = state
        .reservation_service
        .list_for_identity(&identity)
        .await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

/// GET /venues/:venue_id/reservations
pub async fn list_venue_reservations(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(venue_id): AppPath<Uuid>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let reservations = state
        .reservation_service
        .list_for_venue(&VenueId(venue_id), &identity)
        .await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

/// DELETE /reservations/:reservation_id
pub async fn cancel(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(reservation_id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .reservation_service
        .cancel(&ReservationId(reservation_id), &identity)
        .await?;
    Ok(Json(json!({})))
}
