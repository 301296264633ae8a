use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Table, VenueId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venue_tables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub venue_id: Uuid,
    pub table_number: i32,
    pub layout: String,
    pub capacity: i32,
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

impl From<Model> for Table {
    fn from(m: Model) -> Self {
        Table {
            venue_id: VenueId(m.venue_id),
            table_number: m.table_number,
            layout: m.layout,
            capacity: m.capacity,
            created_at: m.created_at.into(),
        }
    }
}
