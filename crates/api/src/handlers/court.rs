use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use courtside_core::{
    availability::{Interval, Reservation, hourly_slots},
    errors::BookingError,
    models::{
        court::{AvailabilityQuery, Court, CourtAvailabilityResponse, CourtRequest},
        room::{MessageResponse, Room, parse_day},
    },
};
use courtside_db::repositories::{court, room};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{AdminUser, OptionalUser},
        error_handling::AppError,
    },
};

async fn find_court(state: &ApiState, id: Uuid) -> Result<Court, AppError> {
    court::get_court_by_id(&state.db_pool, id)
        .await?
        .map(Court::from)
        .ok_or_else(|| AppError(BookingError::NotFound(format!("Court with ID {} not found", id))))
}

/// Active courts; administrators also see deactivated ones.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_courts(
    State(state): State<Arc<ApiState>>,
    viewer: OptionalUser,
) -> Result<Json<Vec<Court>>, AppError> {
    let include_inactive = viewer.actor().is_some_and(|a| a.is_admin);

    let courts = court::list_courts(&state.db_pool, include_inactive)
        .await?
        .into_iter()
        .map(Court::from)
        .collect();

    Ok(Json(courts))
}

#[axum::debug_handler]
pub async fn get_court(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Court>, AppError> {
    Ok(Json(find_court(&state, id).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_court(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CourtRequest>,
) -> Result<(StatusCode, Json<Court>), AppError> {
    let draft = payload.validate()?;
    let created: Court = court::create_court(&state.db_pool, &draft).await?.into();

    info!("Court {} ({}) created by {}", created.name, created.id, admin.user.username);

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_court(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourtRequest>,
) -> Result<Json<Court>, AppError> {
    let draft = payload.validate()?;

    let updated: Court = court::update_court(&state.db_pool, id, &draft)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Court with ID {} not found", id)))?
        .into();

    info!("Court {} updated by {}", id, admin.user.username);

    Ok(Json(updated))
}

/// Deactivates a court. Existing rooms keep their reference to it.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_court(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !court::deactivate_court(&state.db_pool, id).await? {
        return Err(BookingError::NotFound(format!("Court with ID {} not found", id)).into());
    }

    info!("Court {} deactivated by {}", id, admin.user.username);

    Ok(Json(MessageResponse::new("Court deactivated")))
}

/// Hour-by-hour availability of a court on one UTC day.
///
/// `open` and `close` override the configured opening hours for this query.
#[axum::debug_handler]
pub async fn court_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<CourtAvailabilityResponse>, AppError> {
    let court = find_court(&state, id).await?;
    let day = parse_day(&query.date)?;
    let window = state.slot_window.with_overrides(query.open, query.close)?;

    let reservations: Vec<Reservation> = room::get_court_reservations(&state.db_pool, id, Some(Interval::day(day)))
        .await?
        .into_iter()
        .map(|row| Room::from(row).reservation())
        .collect();

    Ok(Json(CourtAvailabilityResponse {
        court_id: court.id,
        date: day,
        hourly_price: court.hourly_price,
        slots: hourly_slots(day, window, &reservations),
    }))
}
