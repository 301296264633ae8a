//! Rating aggregator service
//!
//! Keeps each venue's average rating equal to the mean of its stored reviews.
//! The review row and the venue's sum/count pair change in one store
//! transaction, so readers never see one without the other.

use serde::Serialize;
use std::sync::Arc;

use super::access_policy::AccessPolicy;
use super::venue_service::load_venue;
use crate::domain::calendar;
use crate::domain::entities::{
    Identity, NewReview, RatingAggregate, Review, ReviewId, Score, VenueId,
};
use crate::domain::ports::{ReviewRepository, VenueRepository};
use crate::error::DomainError;

/// A venue's rating after a change
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingUpdate {
    pub venue_id: VenueId,
    /// `None` when the venue has no reviews
    pub rating: Option<f64>,
    pub review_count: i64,
}

impl RatingUpdate {
    pub fn new(venue_id: VenueId, aggregate: RatingAggregate) -> Self {
        Self {
            venue_id,
            rating: aggregate.mean(),
            review_count: aggregate.count,
        }
    }
}

pub struct RatingService<VR, RV>
where
    VR: VenueRepository + ?Sized,
    RV: ReviewRepository + ?Sized,
{
    venues: Arc<VR>,
    reviews: Arc<RV>,
}

impl<VR, RV> RatingService<VR, RV>
where
    VR: VenueRepository + ?Sized,
    RV: ReviewRepository + ?Sized,
{
    pub fn new(venues: Arc<VR>, reviews: Arc<RV>) -> Self {
        Self { venues, reviews }
    }

    /// Record a review and fold it into the venue's rating
    pub async fn submit_review(
        &self,
        venue_id: &VenueId,
        identity: &Identity,
        rating: i32,
        comment: &str,
        timestamp: &str,
    ) -> Result<(Review, RatingUpdate), DomainError> {
        let rating = Score::new(rating)?;
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(DomainError::InvalidArgument(
                "comment is required".to_string(),
            ));
        }
        let timestamp = calendar::parse_timestamp(timestamp)?;

        let (review, aggregate) = self
            .reviews
            .create_and_fold(&NewReview {
                venue_id: *venue_id,
                identity: identity.id.clone(),
                rating,
                comment: comment.to_string(),
                timestamp,
            })
            .await?;

        let update = RatingUpdate::new(*venue_id, aggregate);
        tracing::info!(
            review_id = %review.id,
            venue_id = %venue_id,
            rating = rating.value(),
            review_count = update.review_count,
            "Review submitted"
        );
        Ok((review, update))
    }

    /// Delete a review and remove it from the venue's rating. Authors only.
    pub async fn delete_review(
        &self,
        review_id: &ReviewId,
        identity: &Identity,
    ) -> Result<RatingUpdate, DomainError> {
        let not_found = || DomainError::NotFound(format!("Review {} not found", review_id));

        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(not_found)?;

        if !review.is_owned_by(&identity.id) {
            tracing::warn!(
                review_id = %review_id,
                identity = %identity.id,
                "Review deletion denied"
            );
            return Err(DomainError::PermissionDenied(
                "Only the author can delete a review".to_string(),
            ));
        }

        let (_, aggregate) = self
            .reviews
            .delete_and_unfold(review_id)
            .await?
            .ok_or_else(not_found)?;

        let update = RatingUpdate::new(review.venue_id, aggregate);
        tracing::info!(
            review_id = %review_id,
            venue_id = %review.venue_id,
            review_count = update.review_count,
            "Review deleted"
        );
        Ok(update)
    }

    /// Reviews of a venue, newest first by the review's own timestamp
    pub async fn list_for_venue(&self, venue_id: &VenueId) -> Result<Vec<Review>, DomainError> {
        load_venue(self.venues.as_ref(), venue_id).await?;
        self.reviews.find_by_venue(venue_id).await
    }

    /// Rebuild a venue's aggregate from its stored reviews. Administrators only.
    pub async fn recompute_rating(
        &self,
        venue_id: &VenueId,
        identity: &Identity,
    ) -> Result<RatingUpdate, DomainError> {
        AccessPolicy::require_administrator(identity)?;

        let before = load_venue(self.venues.as_ref(), venue_id).await?.ratings;
        let after = self.reviews.recompute(venue_id).await?;
        if before != after {
            tracing::warn!(
                venue_id = %venue_id,
                stored_sum = before.sum,
                stored_count = before.count,
                sum = after.sum,
                count = after.count,
                "Rating aggregate drift repaired"
            );
        }
        Ok(RatingUpdate::new(*venue_id, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{admin, guest, owner, test_venue, InMemoryStore};
    use chrono::Utc;

    type Service = RatingService<InMemoryStore, InMemoryStore>;

    fn seeded() -> (Service, Arc<InMemoryStore>, VenueId) {
        let venue = test_venue(&owner("alice"));
        let venue_id = venue.id;
        let store = Arc::new(InMemoryStore::new().with_venue(venue));
        (RatingService::new(store.clone(), store.clone()), store, venue_id)
    }

    fn now() -> String {
        Utc::now().to_rfc3339()
    }

    #[tokio::test]
    async fn running_mean_tracks_submissions_and_deletions() {
        let (service, _, venue_id) = seeded();
        let u = guest("u");
        let u2 = guest("u2");

        let (first, update) = service
            .submit_review(&venue_id, &u, 5, "Superb", &now())
            .await
            .unwrap();
        assert_eq!(update.rating, Some(5.0));

        let (_, update) = service
            .submit_review(&venue_id, &u2, 3, "Fine", &now())
            .await
            .unwrap();
        assert_eq!(update.rating, Some(4.0));
        assert_eq!(update.review_count, 2);

        let update = service.delete_review(&first.id, &u).await.unwrap();
        assert_eq!(update.rating, Some(3.0));
        assert_eq!(update.review_count, 1);
    }

    #[tokio::test]
    async fn deleting_last_review_returns_no_rating() {
        let (service, _, venue_id) = seeded();
        let u = guest("u");
        let (review, _) = service
            .submit_review(&venue_id, &u, 2, "Meh", &now())
            .await
            .unwrap();

        let update = service.delete_review(&review.id, &u).await.unwrap();
        assert_eq!(update.rating, None);
        assert_eq!(update.review_count, 0);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_any_write() {
        let (service, store, venue_id) = seeded();
        let u = guest("u");

        for (rating, comment, timestamp) in [
            (0, "ok", now()),
            (6, "ok", now()),
            (3, "   ", now()),
            (3, "ok", "yesterday-ish".to_string()),
        ] {
            let result = service
                .submit_review(&venue_id, &u, rating, comment, &timestamp)
                .await;
            assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        }
        assert_eq!(store.review_count(), 0);
    }

    #[tokio::test]
    async fn review_for_unknown_venue_is_not_found() {
        let (service, _, _) = seeded();
        let result = service
            .submit_review(&VenueId::new(), &guest("u"), 4, "Nice", &now())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn only_author_deletes() {
        let (service, store, venue_id) = seeded();
        let (review, _) = service
            .submit_review(&venue_id, &guest("u"), 4, "Nice", &now())
            .await
            .unwrap();

        for other in [guest("u2"), owner("alice"), admin()] {
            let result = service.delete_review(&review.id, &other).await;
            assert!(matches!(result, Err(DomainError::PermissionDenied(_))));
        }
        assert_eq!(store.review_count(), 1);
    }

    #[tokio::test]
    async fn deleting_missing_review_is_not_found() {
        let (service, _, _) = seeded();
        let result = service.delete_review(&ReviewId::new(), &guest("u")).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn reviews_are_listed_by_review_timestamp() {
        let (service, _, venue_id) = seeded();
        let (later, _) = service
            .submit_review(&venue_id, &guest("u"), 4, "Summer visit", "2030-06-01T12:00:00Z")
            .await
            .unwrap();
        let (earlier, _) = service
            .submit_review(&venue_id, &guest("u2"), 2, "Old memory", "2020-06-01T12:00:00Z")
            .await
            .unwrap();

        let ids: Vec<_> = service
            .list_for_venue(&venue_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![later.id, earlier.id]);
    }

    #[tokio::test]
    async fn equal_timestamps_list_latest_submission_first() {
        let (service, _, venue_id) = seeded();
        let at = "2030-01-01T20:00:00Z";
        let (older, _) = service
            .submit_review(&venue_id, &guest("u"), 4, "First", at)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (newer, _) = service
            .submit_review(&venue_id, &guest("u2"), 2, "Second", at)
            .await
            .unwrap();

        let ids: Vec<_> = service
            .list_for_venue(&venue_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn recompute_repairs_drift_for_admins_only() {
        let (service, store, venue_id) = seeded();
        service
            .submit_review(&venue_id, &guest("u"), 5, "Great", &now())
            .await
            .unwrap();
        service
            .submit_review(&venue_id, &guest("u2"), 2, "Poor", &now())
            .await
            .unwrap();
        store.corrupt_aggregate(&venue_id, RatingAggregate::new(40, 3));

        let denied = service.recompute_rating(&venue_id, &owner("alice")).await;
        assert!(matches!(denied, Err(DomainError::PermissionDenied(_))));

        let update = service.recompute_rating(&venue_id, &admin()).await.unwrap();
        assert_eq!(update.rating, Some(3.5));
        assert_eq!(update.review_count, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_keep_exact_mean() {
        let (service, _, venue_id) = seeded();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let who = guest(&format!("critic-{}", i));
                    service
                        .submit_review(&venue_id, &who, 1 + (i % 5), "Concurrent", &now())
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Each score 1..=5 appears four times: mean is exactly 3.
        let update = service.recompute_rating(&venue_id, &admin()).await.unwrap();
        assert_eq!(update.rating, Some(3.0));
        assert_eq!(update.review_count, 20);
    }
}
