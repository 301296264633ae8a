//! Review handlers
//!
//! Submitting and deleting reviews returns the venue's updated rating.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use crate::app::RatingUpdate;
use crate::domain::entities::{Identity, Review, ReviewId, VenueId};
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Request to submit a review
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    /// ISO-8601 time the review was written
    pub timestamp: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::InvalidArgument(format!("{} is required", field)))
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review_id: ReviewId,
    pub venue_id: VenueId,
    pub identity: String,
    pub rating: i32,
    pub comment: String,
    pub timestamp: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            review_id: review.id,
            venue_id: review.venue_id,
            identity: review.identity.0,
            rating: review.rating.value(),
            comment: review.comment,
            timestamp: review.timestamp.to_rfc3339(),
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

/// Venue rating after a change
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub venue_id: VenueId,
    /// `null` once the last review is gone
    pub new_rating: Option<f64>,
    pub review_count: i64,
}

impl From<RatingUpdate> for RatingResponse {
    fn from(update: RatingUpdate) -> Self {
        Self {
            venue_id: update.venue_id,
            new_rating: update.rating,
            review_count: update.review_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub review_id: ReviewId,
    #[serde(flatten)]
    pub rating: RatingResponse,
}

/// POST /venues/:venue_id/reviews
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(venue_id): AppPath<Uuid>,
    AppJson(request): AppJson<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<SubmitReviewResponse>), AppError> {
    let rating = required(request.rating, "rating")?;
    let comment = required(request.comment, "comment")?;
    let timestamp = required(request.timestamp, "timestamp")?;

    let (review, update) = state
        .rating_service
        .submit_review(&VenueId(venue_id), &identity, rating, &comment, &timestamp)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitReviewResponse {
            review_id: review.id,
            rating: update.into(),
        }),
    ))
}

/// GET /venues/:venue_id/reviews
///
/// Reviews of a venue, newest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    AppPath(venue_id): AppPath<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let reviews = state
        .rating_service
        .list_for_venue(&VenueId(venue_id))
        .await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// DELETE /reviews/:review_id
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(review_id): AppPath<Uuid>,
) -> Result<Json<RatingResponse>, AppError> {
    let update = state
        .rating_service
        .delete_review(&ReviewId(review_id), &identity)
        .await?;
    Ok(Json(update.into()))
}

/// POST /venues/:venue_id/rating/recompute
///
/// Administrator repair path for a drifted aggregate.
pub async fn recompute_rating(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(venue_id): AppPath<Uuid>,
) -> Result<Json<RatingResponse>, AppError> {
    let update = state
        .rating_service
        .recompute_rating(&VenueId(venue_id), &identity)
        .await?;
    Ok(Json(update.into()))
}
