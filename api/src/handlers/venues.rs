//! Venue handlers
//!
//! Endpoints for registering and reading venues.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use crate::domain::entities::{Identity, Venue, VenueId};
use crate::error::AppError;
use crate::AppState;

/// Request to register a venue
#[derive(Debug, Deserialize)]
pub struct RegisterVenueRequest {
    pub name: String,
    pub address: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: VenueId,
    pub owner: String,
    pub name: String,
    pub address: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
    /// Average review score, `null` while the venue has no reviews
    pub rating: Option<f64>,
    pub review_count: i64,
    pub created_at: String,
}

impl From<Venue> for VenueResponse {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id,
            rating: venue.rating(),
            review_count: venue.ratings.count,
            owner: venue.owner.0,
            name: venue.name,
            address: venue.address,
            cuisine: venue.cuisine,
            description: venue.description,
            created_at: venue.created_at.to_rfc3339(),
        }
    }
}

/// POST /venues
///
/// Register a venue owned by the caller.
pub async fn register_venue(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppJson(request): AppJson<RegisterVenueRequest>,
) -> Result<(StatusCode, Json<VenueResponse>), AppError> {
    let venue = state
        .venue_service
        .register_venue(
            &identity,
            &request.name,
            request.address,
            request.cuisine,
            request.description,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(venue.into())))
}

/// GET /venues/:venue_id
pub async fn get_venue(
    State(state): State<AppState>,
    AppPath(venue_id): AppPath<Uuid>,
) -> Result<Json<VenueResponse>, AppError> {
    let venue = state.venue_service.get_venue(&VenueId(venue_id)).await?;
    Ok(Json(venue.into()))
}
