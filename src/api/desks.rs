use axum::{
    Form, Json,
    extract::{Query, State},
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{non_empty, parse_date, parse_desk_id};
use super::{ApiError, AppState, DeskDto, MessageResponse, VacantDeskDto, VacantDesksResponse};
use crate::db::{Assignment, SortColumn, parse_order};
use crate::entities::desks;
use crate::models::desk::{derive_status, display_date};

/// Location stored when the form leaves it blank.
const DEFAULT_LOCATION: &str = "Unassigned";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddOccupantForm {
    #[serde(default)]
    pub desk_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arrival: String,
    #[serde(default)]
    pub leaving: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveOccupantForm {
    #[serde(default)]
    pub desk_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetDetailsForm {
    #[serde(default)]
    pub desk_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddDeskForm {
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ListDesksQuery {
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /add_occupant
/// Assign an occupant to a vacant desk for a date range. Overwrites all
/// seven fields on success.
pub async fn add_occupant(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddOccupantForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let desk_id = parse_desk_id(&form.desk_id)?;
    let name = non_empty(&form.name);
    let arrival = non_empty(&form.arrival);
    let leaving = non_empty(&form.leaving);
    let location = non_empty(&form.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let supervisor = non_empty(&form.supervisor);
    let status = non_empty(&form.status);

    let (Some(name), Some(arrival), Some(leaving)) = (name, arrival, leaving) else {
        return Err(ApiError::validation(
            "Occupant Name, Arrival, and Leaving dates are required.",
        ));
    };

    let desk = state
        .store()
        .get_desk(desk_id)
        .await?
        .ok_or_else(|| ApiError::desk_not_found(desk_id))?;

    if let Some(current) = &desk.occupant {
        return Err(ApiError::validation(format!(
            "Desk {} is already occupied by {}.",
            desk_id, current
        )));
    }

    let arrival_date = parse_date(&arrival)?;
    let leaving_date = parse_date(&leaving)?;
    if arrival_date > leaving_date {
        return Err(ApiError::validation(
            "Leaving date must be after Arrival date.",
        ));
    }

    let message = format!(
        "Added {} to desk {} from {} to {}, Location: {}, Supervisor: {}, Status: {}.",
        name,
        desk_id,
        arrival,
        leaving,
        location,
        supervisor.as_deref().unwrap_or("None"),
        status.as_deref().unwrap_or("None"),
    );

    state
        .store()
        .assign_occupant(
            desk,
            Assignment {
                occupant: name,
                arrival: arrival_date.format("%Y-%m-%d").to_string(),
                leaving: leaving_date.format("%Y-%m-%d").to_string(),
                location,
                supervisor,
                status,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new(message)))
}

/// POST /remove_occupant
/// Clear occupancy; the desk keeps its row and location.
pub async fn remove_occupant(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RemoveOccupantForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let desk_id = parse_desk_id(&form.desk_id)?;

    let desk = state
        .store()
        .get_desk(desk_id)
        .await?
        .ok_or_else(|| ApiError::desk_not_found(desk_id))?;

    let Some(occupant) = desk.occupant.clone() else {
        return Err(ApiError::validation(format!(
            "Desk {} is already vacant.",
            desk_id
        )));
    };

    let location = desk.location.clone();
    state.store().clear_occupant(desk).await?;

    Ok(Json(MessageResponse::new(format!(
        "Removed {} from desk {} ({}).",
        occupant, desk_id, location
    ))))
}

/// POST /set_details
/// Overwrite location/supervisor/status regardless of occupancy and echo
/// the stored values.
pub async fn set_details(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetDetailsForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let desk_id = parse_desk_id(&form.desk_id)?;
    let location = non_empty(&form.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let supervisor = non_empty(&form.supervisor);
    let status = non_empty(&form.status);

    let desk = state
        .store()
        .get_desk(desk_id)
        .await?
        .ok_or_else(|| ApiError::desk_not_found(desk_id))?;

    let updated = state
        .store()
        .set_desk_details(desk, location, supervisor, status)
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "Updated desk {}: Location: {}, Supervisor: {}, Status: {}.",
        desk_id,
        updated.location,
        updated.supervisor.as_deref().unwrap_or("None"),
        updated.status.as_deref().unwrap_or("None"),
    ))))
}

/// POST /add_desk
/// Insert a vacant desk with the next id after the current maximum.
pub async fn add_desk(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddDeskForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let location = non_empty(&form.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    let new_desk_id = state.store().add_desk(location).await?;

    Ok(Json(MessageResponse::new(format!(
        "Added new desk {}.",
        new_desk_id
    ))))
}

/// GET /list_desks
/// All desks as view objects with the derived Vacant/Occupied/Overdue
/// status. Sort key and direction are allow-listed with silent fallback.
pub async fn list_desks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDesksQuery>,
) -> Result<Json<Vec<DeskDto>>, ApiError> {
    let sort = SortColumn::parse(query.sort.as_deref().unwrap_or("desk_id"));
    let order = parse_order(query.order.as_deref().unwrap_or("asc"));

    let desks = state.store().list_desks(sort, order).await?;

    let today = Local::now().date_naive();
    let dtos = desks.into_iter().map(|d| desk_view(d, today)).collect();

    Ok(Json(dtos))
}

/// GET /find_vacant_desks
/// Desks free to book: unoccupied, or past their leaving date.
pub async fn find_vacant_desks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VacantDesksResponse>, ApiError> {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

    let vacant = state
        .store()
        .vacant_desks(&today)
        .await?
        .into_iter()
        .map(|d| VacantDeskDto {
            desk_id: d.desk_id,
            location: d.location,
        })
        .collect();

    Ok(Json(VacantDesksResponse { vacant }))
}

fn desk_view(desk: desks::Model, today: chrono::NaiveDate) -> DeskDto {
    let desk_status =
        derive_status(desk.occupant.as_deref(), desk.leaving.as_deref(), today).to_string();

    DeskDto {
        desk_id: desk.desk_id,
        occupant: desk.occupant.unwrap_or_else(|| "Vacant".to_string()),
        arrival: display_date(desk.arrival.as_deref()),
        leaving: display_date(desk.leaving.as_deref()),
        location: desk.location,
        supervisor: desk.supervisor.unwrap_or_else(|| "-".to_string()),
        status: desk.status.unwrap_or_else(|| "-".to_string()),
        desk_status,
    }
}
