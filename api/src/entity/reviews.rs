use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{IdentityId, Review, ReviewId, Score, VenueId};
use crate::error::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub venue_id: Uuid,
    pub identity: String,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub reviewed_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::venues::Entity",
        from = "Column::VenueId",
        to = "super::venues::Column::Id",
        on_delete = "Cascade"
    )]
    Venue,
}

impl Related<super::venues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// The CHECK constraint keeps stored ratings in range; a row outside it is corrupt.
impl TryFrom<Model> for Review {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let rating = Score::new(m.rating).map_err(|_| {
            DomainError::Internal(format!("review {} has out-of-range rating {}", m.id, m.rating))
        })?;
        Ok(Review {
            id: ReviewId(m.id),
            venue_id: VenueId(m.venue_id),
            identity: IdentityId(m.identity),
            rating,
            comment: m.comment,
            timestamp: m.reviewed_at,
            created_at: m.created_at.into(),
        })
    }
}
