//! Venue directory service
//!
//! Minimal venue registry: enough to give every venue an owner for access
//! checks and a home for its rating aggregate.

use std::sync::Arc;

use crate::domain::entities::{Identity, NewVenue, Venue, VenueId};
use crate::domain::ports::VenueRepository;
use crate::error::DomainError;

/// Load a venue or fail with `NotFound`
pub(crate) async fn load_venue<VR>(venues: &VR, venue_id: &VenueId) -> Result<Venue, DomainError>
where
    VR: VenueRepository + ?Sized,
{
    venues
        .find_by_id(venue_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Venue {} not found", venue_id)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct VenueService<VR>
where
    VR: VenueRepository + ?Sized,
{
    venues: Arc<VR>,
}

impl<VR> VenueService<VR>
where
    VR: VenueRepository + ?Sized,
{
    pub fn new(venues: Arc<VR>) -> Self {
        Self { venues }
    }

    /// Register a venue owned by the caller
    pub async fn register_venue(
        &self,
        identity: &Identity,
        name: &str,
        address: Option<String>,
        cuisine: Option<String>,
        description: Option<String>,
    ) -> Result<Venue, DomainError> {
        if !identity.can_manage_venues() {
            tracing::warn!(
                identity = %identity.id,
                role = %identity.role,
                "Venue registration denied"
            );
            return Err(DomainError::PermissionDenied(
                "Only venue owners and administrators can register venues".to_string(),
            ));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidArgument(
                "venue name is required".to_string(),
            ));
        }

        let venue = self
            .venues
            .create(&NewVenue {
                owner: identity.id.clone(),
                name: name.to_string(),
                address: non_blank(address),
                cuisine: non_blank(cuisine),
                description: non_blank(description),
            })
            .await?;

        tracing::info!(venue_id = %venue.id, owner = %venue.owner, "Venue registered");
        Ok(venue)
    }

    pub async fn get_venue(&self, venue_id: &VenueId) -> Result<Venue, DomainError> {
        load_venue(self.venues.as_ref(), venue_id).await
    }
}
