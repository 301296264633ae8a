//! Table registry and availability handlers

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::domain::calendar;
use crate::domain::entities::{Identity, Table, TableAvailability, VenueId};
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Request to declare a table
#[derive(Debug, Deserialize)]
pub struct DeclareTableRequest {
    pub table_number: i32,
    pub layout: String,
    pub capacity: i32,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub venue_id: VenueId,
    pub table_number: i32,
    pub layout: String,
    pub capacity: i32,
}

impl From<Table> for TableResponse {
    fn from(table: Table) -> Self {
        Self {
            venue_id: table.venue_id,
            table_number: table.table_number,
            layout: table.layout,
            capacity: table.capacity,
        }
    }
}

/// Query parameters for availability: either `date` or `from` + `to`
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl AvailabilityQuery {
    /// Resolve to an inclusive (from, to) pair
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), DomainError> {
        match (&self.date, &self.from, &self.to) {
            (Some(date), None, None) => {
                let date = calendar::parse_date(date)?;
                Ok((date, date))
            }
            (None, Some(from), Some(to)) => {
                Ok((calendar::parse_date(from)?, calendar::parse_date(to)?))
            }
            _ => Err(DomainError::InvalidArgument(
                "pass either date, or both from and to".to_string(),
            )),
        }
    }
}

/// GET /venues/:venue_id/layouts
pub async fn list_layouts(
    State(state): State<AppState>,
    AppPath(venue_id): AppPath<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    let layouts = state.table_service.list_layouts(&VenueId(venue_id)).await?;
    Ok(Json(layouts))
}

/// GET /venues/:venue_id/layouts/:layout/tables
///
/// Tables of a layout, ordered by table number.
pub async fn list_tables(
    State(state): State<AppState>,
    AppPath((venue_id, layout)): AppPath<(Uuid, String)>,
) -> Result<Json<Vec<TableResponse>>, AppError> {
    let tables = state
        .table_service
        .list_tables(&VenueId(venue_id), &layout)
        .await?;
    Ok(Json(tables.into_iter().map(TableResponse::from).collect()))
}

/// GET /venues/:venue_id/layouts/:layout/availability
pub async fn check_availability(
    State(state): State<AppState>,
    AppPath((venue_id, layout)): AppPath<(Uuid, String)>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<Vec<TableAvailability>>, AppError> {
    let (from, to) = query.dates()?;
    let availability = state
        .reservation_service
        .check_availability(&VenueId(venue_id), &layout, from, to)
        .await?;
    Ok(Json(availability))
}

/// POST /venues/:venue_id/tables
pub async fn declare_table(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(venue_id): AppPath<Uuid>,
    AppJson(request): AppJson<DeclareTableRequest>,
) -> Result<(StatusCode, Json<TableResponse>), AppError> {
    let table = state
        .table_service
        .declare_table(
            &identity,
            &VenueId(venue_id),
            request.table_number,
            &request.layout,
            request.capacity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(table.into())))
}

/// DELETE /venues/:venue_id/tables/:table_number
pub async fn remove_table(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath((venue_id, table_number)): AppPath<(Uuid, i32)>,
) -> Result<Json<Value>, AppError> {
    state
        .table_service
        .remove_table(&identity, &VenueId(venue_id), table_number)
        .await?;
    Ok(Json(json!({})))
}
