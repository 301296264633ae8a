//! PostgreSQL adapter for ReviewRepository
//!
//! Each write runs in a transaction that first takes a row lock on the venue
//! (`SELECT ... FOR UPDATE`), so the review rows and the venue's
//! `rating_sum`/`review_count` pair always change together.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::storage_error;
use crate::domain::entities::{NewReview, RatingAggregate, Review, ReviewId, Score, VenueId};
use crate::domain::ports::ReviewRepository;
use crate::entity::{reviews, venues};
use crate::error::DomainError;

/// PostgreSQL implementation of ReviewRepository
pub struct PostgresReviewRepository {
    db: DatabaseConnection,
}

impl PostgresReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn lock_venue(
    txn: &DatabaseTransaction,
    venue_id: Uuid,
) -> Result<venues::Model, DomainError> {
    venues::Entity::find_by_id(venue_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| DomainError::NotFound(format!("Venue {} not found", venue_id)))
}

async fn store_aggregate(
    txn: &DatabaseTransaction,
    venue: venues::Model,
    aggregate: RatingAggregate,
) -> Result<(), DomainError> {
    let mut active: venues::ActiveModel = venue.into();
    active.rating_sum = Set(aggregate.sum);
    active.review_count = Set(aggregate.count);
    active.update(txn).await.map_err(storage_error)?;
    Ok(())
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        let result = reviews::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        result.map(Review::try_from).transpose()
    }

    async fn find_by_venue(&self, venue_id: &VenueId) -> Result<Vec<Review>, DomainError> {
        let results = reviews::Entity::find()
            .filter(reviews::Column::VenueId.eq(venue_id.0))
            .order_by_desc(reviews::Column::ReviewedAt)
            .order_by_desc(reviews::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        results.into_iter().map(Review::try_from).collect()
    }

    async fn create_and_fold(
        &self,
        review: &NewReview,
    ) -> Result<(Review, RatingAggregate), DomainError> {
        let txn = self.db.begin().await.map_err(storage_error)?;

        let venue = lock_venue(&txn, review.venue_id.0).await?;
        let aggregate = venue.ratings().fold(review.rating);

        let model = reviews::ActiveModel {
            id: Set(Uuid::new_v4()),
            venue_id: Set(review.venue_id.0),
            identity: Set(review.identity.0.clone()),
            rating: Set(review.rating.value()),
            comment: Set(review.comment.clone()),
            reviewed_at: Set(review.timestamp),
            created_at: Set(Utc::now().fixed_offset()),
        };
        let inserted = model.insert(&txn).await.map_err(storage_error)?;

        store_aggregate(&txn, venue, aggregate).await?;
        txn.commit().await.map_err(storage_error)?;

        Ok((Review::try_from(inserted)?, aggregate))
    }

    async fn delete_and_unfold(
        &self,
        id: &ReviewId,
    ) -> Result<Option<(Review, RatingAggregate)>, DomainError> {
        let txn = self.db.begin().await.map_err(storage_error)?;

        let Some(model) = reviews::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(storage_error)?
        else {
            return Ok(None);
        };
        let review = Review::try_from(model)?;

        let venue = lock_venue(&txn, review.venue_id.0).await?;

        // A concurrent delete of the same review may have won the venue lock.
        let deleted = reviews::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        if deleted.rows_affected == 0 {
            return Ok(None);
        }

        let aggregate = venue.ratings().unfold(review.rating);
        store_aggregate(&txn, venue, aggregate).await?;
        txn.commit().await.map_err(storage_error)?;

        Ok(Some((review, aggregate)))
    }

    async fn recompute(&self, venue_id: &VenueId) -> Result<RatingAggregate, DomainError> {
        let txn = self.db.begin().await.map_err(storage_error)?;

        let venue = lock_venue(&txn, venue_id.0).await?;

        let ratings: Vec<i32> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::Rating)
            .filter(reviews::Column::VenueId.eq(venue_id.0))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(storage_error)?;
        let scores = ratings
            .into_iter()
            .map(|rating| {
                Score::new(rating).map_err(|_| {
                    DomainError::Internal(format!(
                        "venue {} has a stored rating out of range: {}",
                        venue_id, rating
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let aggregate = RatingAggregate::from_scores(scores);

        store_aggregate(&txn, venue, aggregate).await?;
        txn.commit().await.map_err(storage_error)?;

        Ok(aggregate)
    }
}
