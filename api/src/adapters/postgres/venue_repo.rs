//! PostgreSQL adapter for VenueRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::storage_error;
use crate::domain::entities::{NewVenue, Venue, VenueId};
use crate::domain::ports::VenueRepository;
use crate::entity::venues;
use crate::error::DomainError;

/// PostgreSQL implementation of VenueRepository
pub struct PostgresVenueRepository {
    db: DatabaseConnection,
}

impl PostgresVenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VenueRepository for PostgresVenueRepository {
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, DomainError> {
        let result = venues::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, venue: &NewVenue) -> Result<Venue, DomainError> {
        let model = venues::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_identity: Set(venue.owner.0.clone()),
            name: Set(venue.name.clone()),
            address: Set(venue.address.clone()),
            cuisine: Set(venue.cuisine.clone()),
            description: Set(venue.description.clone()),
            rating_sum: Set(0),
            review_count: Set(0),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(storage_error)?;

        Ok(result.into())
    }
}
