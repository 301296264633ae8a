use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{IdentityId, RatingAggregate, Venue, VenueId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_identity: String,
    pub name: String,
    pub address: Option<String>,
    pub cuisine: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub rating_sum: i64,
    pub review_count: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::venue_tables::Entity")]
    VenueTables,
    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::venue_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VenueTables.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn ratings(&self) -> RatingAggregate {
        RatingAggregate::new(self.rating_sum, self.review_count)
    }
}

impl From<Model> for Venue {
    fn from(m: Model) -> Self {
        let ratings = m.ratings();
        Venue {
            id: VenueId(m.id),
            owner: IdentityId(m.owner_identity),
            name: m.name,
            address: m.address,
            cuisine: m.cuisine,
            description: m.description,
            ratings,
            created_at: m.created_at.into(),
        }
    }
}
